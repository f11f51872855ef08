//! # BioSpace HTTP API Module
//!
//! This module implements the read-only HTTP API using axum.
//!
//! ## Endpoints
//!
//! - `GET /` - Welcome message
//! - `GET /health` - Health check
//! - `GET /api/experiments` - Full table, as loaded
//! - `GET /api/publications` - Search, filter, sort, paginate
//! - `GET /api/publications/{id}` - One publication
//! - `GET /api/publications/stats` - Category, organism and impact counts
//!
//! ## Query Parameters (`/api/publications`)
//!
//! `q`, `category` (comma-separated alternatives), `organism`, `impact`,
//! `offset` (default 0), `limit` (default 50), `sort_by` (column name).

mod handlers;
mod middleware;
mod types;

pub use handlers::{
    experiments_handler, health_handler, publication_handler, publications_handler,
    root_handler, stats_handler,
};
pub use middleware::{GlobalRateLimiter, create_rate_limiter, rate_limit_middleware};
pub use types::{ApiError, ErrorResponse, HealthResponse, WELCOME_MESSAGE, WelcomeResponse};

use crate::config::{ApiConfig, CorsPolicy};
use crate::error::AppError;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::get,
};
use biospace_core::{RecordStore, Stats};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
///
/// The store is immutable, so it is shared behind a plain `Arc` with no
/// lock. Stats are computed once since the data never changes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub stats: Arc<Stats>,
}

impl AppState {
    /// Create app state over a loaded store.
    #[must_use]
    pub fn new(store: RecordStore) -> Self {
        let stats = Stats::compute(store.all());
        Self {
            store: Arc::new(store),
            stats: Arc::new(stats),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer for a policy.
///
/// Origins that are not valid header values are skipped with a warning; if
/// none survive, any origin is allowed.
fn build_cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    match policy {
        CorsPolicy::Any => {
            tracing::info!("CORS: Allowing all origins");
            base.allow_origin(Any)
        }
        CorsPolicy::Origins(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", origin);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!("CORS: No valid origins configured, allowing all origins");
                base.allow_origin(Any)
            } else {
                base.allow_origin(allowed_origins)
            }
        }
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Rate Limiting - global quota (if enabled)
pub fn create_router(state: AppState, config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_handler))
        .route("/api/experiments", get(handlers::experiments_handler))
        .route("/api/publications", get(handlers::publications_handler))
        .route("/api/publications/stats", get(handlers::stats_handler))
        .route("/api/publications/{id}", get(handlers::publication_handler));

    match create_rate_limiter(config.rate_limit) {
        Some(limiter) => {
            tracing::info!(
                "Rate limiting enabled: {} requests/second",
                config.rate_limit
            );
            router = router.layer(axum_middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit_middleware,
            ));
        }
        None => tracing::info!("Rate limiting disabled"),
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(&config.cors)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server over an already loaded store.
pub async fn run_server(
    addr: &str,
    store: RecordStore,
    config: &ApiConfig,
) -> Result<(), AppError> {
    let state = AppState::new(store);
    let router = create_router(state, config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("BioSpace HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| AppError::Io(format!("Server error: {}", e)))
}

// =============================================================================
// TESTS
// =============================================================================
