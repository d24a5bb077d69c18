//! The stateless search/add workflow.
//!
//! Telegram callbacks carry no server-side session, so the entire workflow
//! state travels inside the button's callback payload ([`token::Action`]).
//! [`render`] turns lookup results into menus, [`machine`] interprets a
//! decoded action and performs the next backend call(s).

/// Workflow state machine
pub mod machine;
/// Search-result and quality menus
pub mod render;
/// Action token encoding/decoding
pub mod token;

use crate::backend::BackendError;
use thiserror::Error;
use token::ProtocolError;

/// Everything that can go wrong while advancing the workflow.
///
/// `Protocol` is a local bug/tamper signal and must never reach a backend;
/// `Upstream` carries the backend's message verbatim; `Configuration` means
/// the backend is reachable but missing required setup.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("{0}")]
    Protocol(#[from] ProtocolError),
    #[error("{0}")]
    Upstream(#[from] BackendError),
    #[error("{0}")]
    Configuration(String),
}
