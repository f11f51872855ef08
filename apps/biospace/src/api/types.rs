//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API that are not
//! already serializable core types (records, query pages, stats).

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use biospace_core::BiospaceError;
use serde::{Deserialize, Serialize};

/// Greeting returned by `GET /`.
pub const WELCOME_MESSAGE: &str = "Welcome to BioSpace Explorer API!";

// =============================================================================
// WELCOME RESPONSE
// =============================================================================

/// Root endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
        }
    }
}

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub records: usize,
}

impl HealthResponse {
    pub fn ok(records: usize) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            records,
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

/// Body of every non-2xx response produced by a handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind, e.g. `invalid_parameter`.
    pub error: String,
    pub message: String,
}

/// A handler failure, carrying its HTTP status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    /// 404 for a path that names no record, including unparsable ids.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorResponse {
                error: "not_found".to_string(),
                message: message.into(),
            },
        }
    }

    /// 400 for a query string that cannot be read at all.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: "invalid_parameter".to_string(),
                message: message.into(),
            },
        }
    }
}

impl From<BiospaceError> for ApiError {
    fn from(err: BiospaceError) -> Self {
        let status = match &err {
            BiospaceError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            BiospaceError::NotFound(_) => StatusCode::NOT_FOUND,
            BiospaceError::DatasetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        Self {
            status,
            body: ErrorResponse {
                error: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
