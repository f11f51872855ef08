//! # Application Errors
//!
//! Errors raised outside the query engine: configuration, sockets, and
//! dataset failures bubbling up from `biospace-core`.

use biospace_core::BiospaceError;
use thiserror::Error;

/// Errors that stop a CLI command or the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// The dataset could not be loaded, or a lookup/query failed.
    #[error(transparent)]
    Core(#[from] BiospaceError),

    /// The configuration file is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Command output could not be encoded as JSON.
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Binding or serving the HTTP listener failed.
    #[error("I/O error: {0}")]
    Io(String),
}
