//! HTTP surface for model comparison.
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /models - Display names of the free-model catalog
//! - POST /compare - Send one prompt to the selected models

mod handlers;
mod types;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::catalog::ModelCatalog;
use crate::compare::Comparator;
use crate::config::CorsConfig;
use crate::error::LlmBoxError;

pub use types::*;

/// Application state shared across handlers.
///
/// The catalog is built once before the server starts and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ModelCatalog>,
    pub comparator: Comparator,
}

impl AppState {
    pub fn new(catalog: ModelCatalog, comparator: Comparator) -> Self {
        Self {
            catalog: Arc::new(catalog),
            comparator,
        }
    }
}

/// CORS policy admitting exactly one browser origin.
pub fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer, LlmBoxError> {
    let origin = HeaderValue::from_str(cors.normalized_origin()).map_err(|e| {
        LlmBoxError::ConfigError(format!("invalid CORS origin '{}': {}", cors.allowed_origin, e))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Create the API router with custom state.
pub fn create_router_with_state(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/models", get(handlers::list_models))
        .route("/compare", post(handlers::compare_models))
        .with_state(Arc::new(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
