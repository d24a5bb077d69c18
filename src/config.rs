//! Configuration and settings management
//!
//! Loads settings from environment variables (and an optional `.env` file
//! picked up by `dotenvy` in `main`). Radarr and Sonarr are mandatory;
//! Prowlarr and qBittorrent are optional and only used by `/status`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

const fn default_radarr_port() -> u16 {
    7878
}

const fn default_sonarr_port() -> u16 {
    8989
}

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    pub telegram_bot_token: String,

    /// Radarr host name or IP
    pub radarr_host: String,
    /// Radarr port
    #[serde(default = "default_radarr_port")]
    pub radarr_port: u16,
    /// Radarr API key
    pub radarr_api_key: String,

    /// Sonarr host name or IP
    pub sonarr_host: String,
    /// Sonarr port
    #[serde(default = "default_sonarr_port")]
    pub sonarr_port: u16,
    /// Sonarr API key
    pub sonarr_api_key: String,

    /// Prowlarr host name or IP (optional, `/status` only)
    pub prowlarr_host: Option<String>,
    /// Prowlarr port
    pub prowlarr_port: Option<u16>,
    /// Prowlarr API key
    pub prowlarr_api_key: Option<String>,

    /// qBittorrent host name or IP (optional, `/status` only)
    pub qbittorrent_host: Option<String>,
    /// qBittorrent WebUI port
    pub qbittorrent_port: Option<u16>,
    /// qBittorrent WebUI user
    pub qbittorrent_user: Option<String>,
    /// qBittorrent WebUI password
    pub qbittorrent_pass: Option<String>,
}

impl Settings {
    /// Create new settings by loading from the environment
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading or validation fails.
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Environment::default() auto-converts UPPER_SNAKE_CASE to snake_case.
            // ignore_empty treats empty env vars as unset.
            .add_source(Environment::default().ignore_empty(true))
            .build()?;

        let settings: Self = s.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject placeholder credentials copied verbatim from the sample `.env`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the first offending variable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("TELEGRAM_BOT_TOKEN", &self.telegram_bot_token),
            ("RADARR_API_KEY", &self.radarr_api_key),
            ("SONARR_API_KEY", &self.sonarr_api_key),
        ];
        for (name, value) in checks {
            if value.is_empty() || value.contains("YOUR_") {
                return Err(ConfigError::Message(format!(
                    "{name} is missing or still set to its placeholder value"
                )));
            }
        }
        Ok(())
    }

    /// Radarr base URL
    #[must_use]
    pub fn radarr_url(&self) -> String {
        format!("http://{}:{}", self.radarr_host, self.radarr_port)
    }

    /// Sonarr base URL
    #[must_use]
    pub fn sonarr_url(&self) -> String {
        format!("http://{}:{}", self.sonarr_host, self.sonarr_port)
    }

    /// Prowlarr base URL, if configured
    #[must_use]
    pub fn prowlarr_url(&self) -> Option<String> {
        match (&self.prowlarr_host, self.prowlarr_port) {
            (Some(host), Some(port)) => Some(format!("http://{host}:{port}")),
            _ => None,
        }
    }

    /// qBittorrent base URL, if configured
    #[must_use]
    pub fn qbittorrent_url(&self) -> Option<String> {
        match (&self.qbittorrent_host, self.qbittorrent_port) {
            (Some(host), Some(port)) => Some(format!("http://{host}:{port}")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> Settings {
        Settings {
            telegram_bot_token: "123456:dummy".to_string(),
            radarr_host: "radarr".to_string(),
            radarr_port: 7878,
            radarr_api_key: "aaaa".to_string(),
            sonarr_host: "sonarr".to_string(),
            sonarr_port: 8989,
            sonarr_api_key: "bbbb".to_string(),
            prowlarr_host: None,
            prowlarr_port: None,
            prowlarr_api_key: None,
            qbittorrent_host: None,
            qbittorrent_port: None,
            qbittorrent_user: None,
            qbittorrent_pass: None,
        }
    }

    #[test]
    fn test_validate_accepts_real_credentials() {
        assert!(base_settings().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_placeholder_token() {
        let mut settings = base_settings();
        settings.telegram_bot_token = "YOUR_TELEGRAM_BOT_TOKEN".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_api_key() {
        let mut settings = base_settings();
        settings.sonarr_api_key = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_url_builders() {
        let mut settings = base_settings();
        assert_eq!(settings.radarr_url(), "http://radarr:7878");
        assert_eq!(settings.sonarr_url(), "http://sonarr:8989");
        assert_eq!(settings.prowlarr_url(), None);

        settings.prowlarr_host = Some("prowlarr".to_string());
        settings.prowlarr_port = Some(9696);
        assert_eq!(
            settings.prowlarr_url(),
            Some("http://prowlarr:9696".to_string())
        );
    }
}
