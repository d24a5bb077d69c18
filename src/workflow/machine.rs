//! Workflow state machine.
//!
//! Interprets a decoded [`Action`], performs the next backend call(s), and
//! either yields the next menu or a terminal outcome. There is no stored
//! state between steps: every terminal transition re-resolves the item by
//! its external id, so a replayed token (double tap) lands in the
//! already-added success path instead of creating a duplicate.

use super::render::{self, Menu, SearchReply};
use super::token::Action;
use super::WorkflowError;
use crate::backend::{BackendError, CatalogItem, CatalogKind, MediaBackend};
use serde_json::{json, Value};
use tracing::info;

/// What a workflow step produced.
#[derive(Debug)]
pub enum StepReply {
    /// A further menu; the chat message is edited in place
    Menu(Menu),
    /// A terminal outcome; no further tokens are attached
    Done(Outcome),
}

/// Terminal workflow outcomes.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Added { kind: CatalogKind, title: String },
    /// `kind` is unknown when reached via the bare `already_added` token
    AlreadyAdded { kind: Option<CatalogKind> },
    /// The item vanished from the backend's lookup between steps
    MissingDetails { kind: CatalogKind },
}

/// The backend signals a duplicate add as a validation error, not a distinct
/// status code. Matching its wording is fragile but deliberate; if the
/// upstream service rewords the message this reverts to a generic failure.
#[must_use]
pub fn is_duplicate_error(message: &str) -> bool {
    message.contains("already been added")
}

fn build_add_payload(
    kind: CatalogKind,
    item: &CatalogItem,
    profile_id: i64,
    root_folder: &str,
) -> Value {
    let mut payload = json!({
        "title": item.title,
        "year": item.year,
        "qualityProfileId": profile_id,
        "rootFolderPath": root_folder,
        "images": item.images,
        "addOptions": { "searchForMovie": true },
    });
    payload[kind.id_field()] = json!(item.id);
    if kind == CatalogKind::Series {
        payload["seasons"] = item.seasons.clone();
        payload["addOptions"] = json!({
            "ignoreEpisodesWithFiles": false,
            "ignoreEpisodesWithoutFiles": false,
            "searchForMissingEpisodes": true,
        });
    }
    payload
}

/// Drives one interaction against the two media-manager backends.
///
/// Borrows trait objects so the whole machine runs against fakes in tests.
pub struct Orchestrator<'a> {
    movies: &'a dyn MediaBackend,
    series: &'a dyn MediaBackend,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub fn new(movies: &'a dyn MediaBackend, series: &'a dyn MediaBackend) -> Self {
        Self { movies, series }
    }

    fn backend(&self, kind: CatalogKind) -> &dyn MediaBackend {
        match kind {
            CatalogKind::Movie => self.movies,
            CatalogKind::Series => self.series,
        }
    }

    /// Run a free-text search and render the first menu.
    ///
    /// # Errors
    ///
    /// Returns a `WorkflowError` if the lookup call fails.
    pub async fn search(
        &self,
        kind: CatalogKind,
        query: &str,
    ) -> Result<SearchReply, WorkflowError> {
        let items = self.backend(kind).lookup(query).await?;
        Ok(render::render_results(kind, query, &items))
    }

    /// Advance the workflow by one decoded action.
    ///
    /// # Errors
    ///
    /// Returns a `WorkflowError` when a backend call fails or required
    /// backend setup is missing.
    pub async fn respond(&self, action: Action) -> Result<StepReply, WorkflowError> {
        match action {
            Action::AlreadyAdded => Ok(StepReply::Done(Outcome::AlreadyAdded { kind: None })),
            Action::SelectQuality { catalog_id } => self.quality_selection(catalog_id).await,
            Action::AddWithQuality {
                catalog_id,
                profile_id,
            } => {
                self.add(CatalogKind::Movie, catalog_id, Some(profile_id))
                    .await
            }
            Action::AddSeries { catalog_id } => {
                self.add(CatalogKind::Series, catalog_id, None).await
            }
        }
    }

    async fn quality_selection(&self, catalog_id: i64) -> Result<StepReply, WorkflowError> {
        let profiles = self.movies.quality_profiles().await?;
        if profiles.is_empty() {
            return Err(WorkflowError::Configuration(
                "Radarr 未配置质量配置。".to_string(),
            ));
        }
        Ok(StepReply::Menu(render::quality_menu(catalog_id, &profiles)))
    }

    async fn first_profile_id(&self, kind: CatalogKind) -> Result<i64, WorkflowError> {
        let profiles = self.backend(kind).quality_profiles().await?;
        profiles.first().map(|p| p.id).ok_or_else(|| {
            WorkflowError::Configuration(format!("{} 未配置质量配置。", kind.service_name()))
        })
    }

    async fn add(
        &self,
        kind: CatalogKind,
        catalog_id: i64,
        profile_id: Option<i64>,
    ) -> Result<StepReply, WorkflowError> {
        let backend = self.backend(kind);

        // Re-resolve by external id: menu-time fields may be stale or
        // incomplete for the add payload.
        let term = format!("{}{catalog_id}", kind.lookup_prefix());
        let results = backend.lookup(&term).await?;
        let Some(item) = results.first() else {
            return Ok(StepReply::Done(Outcome::MissingDetails { kind }));
        };

        let profile_id = match profile_id {
            Some(id) => id,
            None => self.first_profile_id(kind).await?,
        };

        let folders = backend.root_folders().await?;
        let Some(folder) = folders.first() else {
            return Err(WorkflowError::Configuration(format!(
                "{} 未配置根目录。",
                kind.service_name()
            )));
        };

        let payload = build_add_payload(kind, item, profile_id, &folder.path);
        match backend.add_item(&payload).await {
            Ok(added) => {
                let title = added["title"].as_str().unwrap_or("N/A").to_string();
                info!(service = kind.service_name(), title, "item added");
                Ok(StepReply::Done(Outcome::Added { kind, title }))
            }
            Err(BackendError::Api { message, .. }) if is_duplicate_error(&message) => {
                Ok(StepReply::Done(Outcome::AlreadyAdded { kind: Some(kind) }))
            }
            Err(e) => Err(e.into()),
        }
    }
}
