/// HTTP clients for the media-manager and download-client backends
pub mod backend;
/// Telegram command and callback handlers
pub mod bot;
/// Configuration and settings management
pub mod config;
/// Search/add workflow: token protocol, renderer and state machine
pub mod workflow;
