//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers. Every handler
//! only reads from the shared store; none of them can change it.

use super::{
    AppState,
    types::{ApiError, HealthResponse, WelcomeResponse},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use biospace_core::{QueryEngine, QueryParams, QuerySpec, Record, RecordRow};

// =============================================================================
// ROOT / HEALTH
// =============================================================================

/// Welcome message.
pub async fn root_handler() -> impl IntoResponse {
    Json(WelcomeResponse::default())
}

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::ok(state.store.len()))
}

// =============================================================================
// EXPERIMENTS HANDLER
// =============================================================================

/// The whole table as loaded, without synthetic ids.
pub async fn experiments_handler(State(state): State<AppState>) -> Response {
    let rows: Vec<RecordRow<'_>> = state.store.all().iter().map(Record::as_row).collect();
    Json(rows).into_response()
}

// =============================================================================
// PUBLICATIONS HANDLERS
// =============================================================================

/// Filtered, sorted, paginated publications.
///
/// Parameters are read as raw pairs so a repeated name keeps its first value
/// instead of failing the whole request.
pub async fn publications_handler(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(pairs) = query.map_err(|rejection| {
        tracing::debug!("Unreadable query string: {}", rejection);
        ApiError::invalid_query(rejection.body_text())
    })?;
    let params = QueryParams::from_pairs(pairs);

    let spec = QuerySpec::from_params(&params).map_err(|e| {
        tracing::debug!("Rejected publications query: {}", e);
        ApiError::from(e)
    })?;

    if !spec.sort_by.is_empty() && !state.store.columns().contains(&spec.sort_by) {
        tracing::debug!(
            sort_by = %spec.sort_by,
            "Unknown sort column, keeping filter order"
        );
    }

    let result = QueryEngine::execute(state.store.all(), &spec);
    tracing::debug!(
        total = result.total,
        returned = result.results.len(),
        "Publications query"
    );

    Ok(Json(result).into_response())
}

/// One publication by id.
///
/// Anything that is not an in-range integer is 404.
pub async fn publication_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id: i64 = raw_id
        .parse()
        .map_err(|_| ApiError::not_found(format!("Record not found: {}", raw_id)))?;

    let record = state.store.by_id(id)?;
    Ok(Json(record).into_response())
}

/// Category, organism and impact counts over the whole dataset.
pub async fn stats_handler(State(state): State<AppState>) -> Response {
    Json(state.stats.as_ref()).into_response()
}
