//! Backend clients and shared data model.
//!
//! Radarr and Sonarr expose the same v3 API shape, so a single client is
//! parameterized by [`CatalogKind`]. The [`MediaBackend`] trait is the seam
//! the workflow is written against, which keeps the state machine testable
//! with fake endpoints.

/// Radarr/Sonarr-style HTTP client
pub mod arr;
/// qBittorrent WebUI probe used by `/status`
pub mod qbittorrent;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Failure talking to an external backend.
///
/// `Api` carries the best-effort human-readable message extracted from the
/// response body; it is surfaced to the user verbatim.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{service} 请求失败: {message}")]
    Network { service: String, message: String },
    #[error("{service} API 错误: {message}")]
    Api { service: String, message: String },
    #[error("{service} 返回了无法解析的响应: {message}")]
    Json { service: String, message: String },
}

/// Which external catalog an item belongs to.
///
/// Movies and series share the token format and state machine but differ in
/// step count and payload fields; everything kind-specific lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Movie,
    Series,
}

impl CatalogKind {
    /// API resource name, also the POST endpoint for the add call
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    /// JSON field holding the external catalog identifier
    #[must_use]
    pub const fn id_field(self) -> &'static str {
        match self {
            Self::Movie => "tmdbId",
            Self::Series => "tvdbId",
        }
    }

    /// Lookup-term prefix that re-resolves an item by its external id
    #[must_use]
    pub const fn lookup_prefix(self) -> &'static str {
        match self {
            Self::Movie => "tmdb:",
            Self::Series => "tvdb:",
        }
    }

    /// Backing service display name
    #[must_use]
    pub const fn service_name(self) -> &'static str {
        match self {
            Self::Movie => "Radarr",
            Self::Series => "Sonarr",
        }
    }

    /// User-facing noun
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Movie => "电影",
            Self::Series => "剧集",
        }
    }

    /// Whether the add flow includes a quality-profile selection step.
    /// Movies do, series go straight to the add with the first profile.
    #[must_use]
    pub const fn needs_quality_menu(self) -> bool {
        matches!(self, Self::Movie)
    }
}

/// A lookup result as known to the external catalog.
///
/// Transient: re-fetched by id on every workflow step, never cached.
#[derive(Debug, Clone)]
pub struct CatalogItem {
    /// External catalog identifier (tmdb/tvdb); 0 is the unknown sentinel
    pub id: i64,
    pub title: String,
    pub year: i64,
    /// The backend already tracks this item (non-zero internal id)
    pub already_added: bool,
    /// Artwork payload, passed through unmodified to the add call
    pub images: Value,
    /// Season payload (series only), passed through unmodified
    pub seasons: Value,
}

impl CatalogItem {
    /// Build an item from one element of a lookup response.
    #[must_use]
    pub fn from_lookup(kind: CatalogKind, value: &Value) -> Self {
        Self {
            id: value[kind.id_field()].as_i64().unwrap_or(0),
            title: value["title"].as_str().unwrap_or("N/A").to_string(),
            year: value["year"].as_i64().unwrap_or(0),
            already_added: value["id"].as_i64().unwrap_or(0) != 0,
            images: value.get("images").cloned().unwrap_or(Value::Null),
            seasons: value.get("seasons").cloned().unwrap_or(Value::Null),
        }
    }
}

/// A named quality configuration on the media manager
#[derive(Debug, Clone, Deserialize)]
pub struct QualityProfile {
    pub id: i64,
    pub name: String,
}

/// Destination library location on the media manager
#[derive(Debug, Clone, Deserialize)]
pub struct RootFolder {
    pub path: String,
}

/// Contract the workflow consumes from a media-manager backend.
#[async_trait::async_trait]
pub trait MediaBackend: Send + Sync {
    /// Free-text or `tmdb:`/`tvdb:` prefixed lookup
    async fn lookup(&self, term: &str) -> Result<Vec<CatalogItem>, BackendError>;
    /// Quality profiles, enumerated fresh per add flow
    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, BackendError>;
    /// Root folders; the first entry is the destination by policy
    async fn root_folders(&self) -> Result<Vec<RootFolder>, BackendError>;
    /// POST the add payload; returns the created record
    async fn add_item(&self, payload: &Value) -> Result<Value, BackendError>;
    /// Version string from `system/status`, health report only
    async fn system_version(&self) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_from_movie_lookup() {
        let value = json!({
            "title": "Inception",
            "year": 2010,
            "tmdbId": 27205,
            "id": 0,
            "images": [{"coverType": "poster"}],
        });
        let item = CatalogItem::from_lookup(CatalogKind::Movie, &value);
        assert_eq!(item.id, 27205);
        assert_eq!(item.title, "Inception");
        assert_eq!(item.year, 2010);
        assert!(!item.already_added);
        assert!(item.images.is_array());
        assert!(item.seasons.is_null());
    }

    #[test]
    fn test_item_from_series_lookup_marks_added() {
        let value = json!({
            "title": "Severance",
            "year": 2022,
            "tvdbId": 371980,
            "id": 42,
            "seasons": [{"seasonNumber": 1}],
        });
        let item = CatalogItem::from_lookup(CatalogKind::Series, &value);
        assert_eq!(item.id, 371980);
        assert!(item.already_added);
        assert!(item.seasons.is_array());
    }

    #[test]
    fn test_missing_fields_fall_back_to_sentinels() {
        let item = CatalogItem::from_lookup(CatalogKind::Movie, &json!({}));
        assert_eq!(item.id, 0);
        assert_eq!(item.title, "N/A");
        assert!(!item.already_added);
    }
}
