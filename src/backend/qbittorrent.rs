//! qBittorrent WebUI probe.
//!
//! The bot consumes nothing from the download client beyond a login and a
//! version read for the `/status` health report. The WebUI authenticates via
//! a session cookie, so the client keeps a cookie store.

use super::BackendError;
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::error;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Login + version probe for the qBittorrent WebUI.
pub struct QbitClient {
    base_url: String,
    username: String,
    password: String,
    http: HttpClient,
}

impl QbitClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, username: String, password: String) -> Self {
        let http = HttpClient::builder()
            .timeout(PROBE_TIMEOUT)
            .cookie_store(true)
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self {
            base_url: base_url.into(),
            username,
            password,
            http,
        }
    }

    fn service_error(&self, message: impl Into<String>) -> BackendError {
        let message = message.into();
        error!(service = "qBittorrent", message, "probe failed");
        BackendError::Api {
            service: "qBittorrent".to_string(),
            message,
        }
    }

    /// Log in and read the application version.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the login is rejected or either round
    /// trip fails.
    pub async fn version(&self) -> Result<String, BackendError> {
        let login = self
            .http
            .post(format!("{}/api/v2/auth/login", self.base_url))
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| self.service_error(e.to_string()))?;

        if !login.status().is_success() {
            return Err(self.service_error(format!("登录失败 (HTTP {})", login.status())));
        }
        // The WebUI answers 200 with a literal "Fails." on bad credentials.
        let body = login
            .text()
            .await
            .map_err(|e| self.service_error(e.to_string()))?;
        if body.trim() != "Ok." {
            return Err(self.service_error("登录失败（用户名或密码错误）"));
        }

        let version = self
            .http
            .get(format!("{}/api/v2/app/version", self.base_url))
            .send()
            .await
            .map_err(|e| self.service_error(e.to_string()))?
            .text()
            .await
            .map_err(|e| self.service_error(e.to_string()))?;
        Ok(version.trim().trim_start_matches('v').to_string())
    }
}
