//! Thin HTTP accessor for Radarr/Sonarr-style APIs.
//!
//! Every call injects the API key as the `apikey` query parameter. Failures
//! are surfaced immediately to the caller with the best-effort structured
//! error message; there are no retries.

use super::{BackendError, CatalogItem, CatalogKind, MediaBackend, QualityProfile, RootFolder};
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;
use tracing::error;

/// Per-call network timeout, matching the upstream services' defaults
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

fn build_http_client() -> HttpClient {
    HttpClient::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Extract a human-readable message from an error response body.
///
/// Radarr/Sonarr signal validation failures as a JSON list of error objects;
/// the first element's `errorMessage` is the useful part. Plain objects and
/// non-JSON bodies fall back progressively.
fn extract_error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    let message = match &parsed {
        Value::Array(items) => items.first().and_then(|item| {
            item["errorMessage"]
                .as_str()
                .or_else(|| item["message"].as_str())
        }),
        Value::Object(_) => parsed["message"]
            .as_str()
            .or_else(|| parsed["error"].as_str()),
        _ => None,
    };
    message.map(ToString::to_string)
}

/// Key-injecting GET/POST accessor for one `*arr` service.
pub struct ApiClient {
    service: String,
    base_url: String,
    api_base: &'static str,
    api_key: String,
    http: HttpClient,
}

impl ApiClient {
    /// Client for a v3 API (Radarr, Sonarr)
    #[must_use]
    pub fn new(service: impl Into<String>, base_url: impl Into<String>, api_key: String) -> Self {
        Self::with_api_base(service, base_url, api_key, "api/v3")
    }

    /// Client with an explicit API base segment (Prowlarr uses `api/v1`)
    #[must_use]
    pub fn with_api_base(
        service: impl Into<String>,
        base_url: impl Into<String>,
        api_key: String,
        api_base: &'static str,
    ) -> Self {
        Self {
            service: service.into(),
            base_url: base_url.into(),
            api_base,
            api_key,
            http: build_http_client(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{path}", self.base_url, self.api_base)
    }

    fn network_error(&self, path: &str, e: &reqwest::Error) -> BackendError {
        error!(service = %self.service, path, error = %e, "backend request failed");
        BackendError::Network {
            service: self.service.clone(),
            message: e.to_string(),
        }
    }

    async fn decode_response(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<Value, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message =
                extract_error_message(&body).unwrap_or_else(|| format!("HTTP {status}: {body}"));
            error!(service = %self.service, path, %status, message, "backend returned error");
            return Err(BackendError::Api {
                service: self.service.clone(),
                message,
            });
        }
        response.json().await.map_err(|e| {
            error!(service = %self.service, path, error = %e, "backend response not JSON");
            BackendError::Json {
                service: self.service.clone(),
                message: e.to_string(),
            }
        })
    }

    /// GET `{base}/{api_base}/{path}` with the API key injected.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` on transport failure, non-2xx status or an
    /// unparseable body.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, BackendError> {
        let response = self
            .http
            .get(self.url(path))
            .query(&[("apikey", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| self.network_error(path, &e))?;
        self.decode_response(path, response).await
    }

    /// POST a JSON body to `{base}/{api_base}/{path}` with the API key injected.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` on transport failure, non-2xx status or an
    /// unparseable body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, BackendError> {
        let response = self
            .http
            .post(self.url(path))
            .query(&[("apikey", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| self.network_error(path, &e))?;
        self.decode_response(path, response).await
    }

    /// Version string from `system/status`.
    ///
    /// # Errors
    ///
    /// Returns a `BackendError` if the probe fails.
    pub async fn system_version(&self) -> Result<String, BackendError> {
        let status = self.get("system/status", &[]).await?;
        Ok(status["version"].as_str().unwrap_or("N/A").to_string())
    }
}

/// A catalog-kind-bound media-manager backend (Radarr or Sonarr).
pub struct ArrClient {
    kind: CatalogKind,
    api: ApiClient,
}

impl ArrClient {
    #[must_use]
    pub fn new(kind: CatalogKind, base_url: impl Into<String>, api_key: String) -> Self {
        Self {
            kind,
            api: ApiClient::new(kind.service_name(), base_url, api_key),
        }
    }
}

#[async_trait::async_trait]
impl MediaBackend for ArrClient {
    async fn lookup(&self, term: &str) -> Result<Vec<CatalogItem>, BackendError> {
        let path = format!("{}/lookup", self.kind.endpoint());
        let results = self.api.get(&path, &[("term", term)]).await?;
        let items = results
            .as_array()
            .map(|list| {
                list.iter()
                    .map(|value| CatalogItem::from_lookup(self.kind, value))
                    .collect()
            })
            .unwrap_or_default();
        Ok(items)
    }

    async fn quality_profiles(&self) -> Result<Vec<QualityProfile>, BackendError> {
        let profiles = self.api.get("qualityprofile", &[]).await?;
        serde_json::from_value(profiles).map_err(|e| BackendError::Json {
            service: self.kind.service_name().to_string(),
            message: e.to_string(),
        })
    }

    async fn root_folders(&self) -> Result<Vec<RootFolder>, BackendError> {
        let folders = self.api.get("rootfolder", &[]).await?;
        serde_json::from_value(folders).map_err(|e| BackendError::Json {
            service: self.kind.service_name().to_string(),
            message: e.to_string(),
        })
    }

    async fn add_item(&self, payload: &Value) -> Result<Value, BackendError> {
        self.api.post(self.kind.endpoint(), payload).await
    }

    async fn system_version(&self) -> Result<String, BackendError> {
        self.api.system_version().await
    }
}
