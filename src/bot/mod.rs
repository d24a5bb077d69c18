//! Telegram surface: command handlers, callback handling and rendering.

/// Command and callback-query handlers
pub mod handlers;
/// Keyboards and user-facing message texts
pub mod views;

use crate::backend::arr::{ApiClient, ArrClient};
use crate::backend::qbittorrent::QbitClient;
use crate::backend::CatalogKind;
use crate::config::Settings;
use crate::workflow::machine::Orchestrator;

/// All external collaborators, built once from settings at startup.
pub struct Backends {
    pub movies: ArrClient,
    pub series: ArrClient,
    /// Prowlarr status probe, if configured
    pub indexer: Option<ApiClient>,
    /// qBittorrent status probe, if configured
    pub downloader: Option<QbitClient>,
}

impl Backends {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let indexer = match (settings.prowlarr_url(), &settings.prowlarr_api_key) {
            (Some(url), Some(key)) => Some(ApiClient::with_api_base(
                "Prowlarr",
                url,
                key.clone(),
                "api/v1",
            )),
            _ => None,
        };
        let downloader = settings.qbittorrent_url().map(|url| {
            QbitClient::new(
                url,
                settings.qbittorrent_user.clone().unwrap_or_default(),
                settings.qbittorrent_pass.clone().unwrap_or_default(),
            )
        });
        Self {
            movies: ArrClient::new(
                CatalogKind::Movie,
                settings.radarr_url(),
                settings.radarr_api_key.clone(),
            ),
            series: ArrClient::new(
                CatalogKind::Series,
                settings.sonarr_url(),
                settings.sonarr_api_key.clone(),
            ),
            indexer,
            downloader,
        }
    }

    /// Workflow orchestrator borrowing the two media backends.
    #[must_use]
    pub fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(&self.movies, &self.series)
    }
}
