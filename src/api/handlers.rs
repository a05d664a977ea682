//! HTTP handlers for the comparison API.

use super::types::*;
use super::AppState;
use crate::error::LlmBoxError;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        app: "llmbox",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Display names of every catalog entry, in catalog order.
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.catalog.names().map(str::to_string).collect())
}

/// Run one comparison. Per-model failures land inside `results`; only a
/// malformed body is reported as an HTTP error.
pub async fn compare_models(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResponse>, LlmBoxError> {
    let Json(request) = payload.map_err(|e| LlmBoxError::InvalidRequest(e.body_text()))?;
    let span = tracing::info_span!("compare", request_id = %Uuid::new_v4());

    let results = async {
        let CompareRequest {
            prompt,
            models,
            user_key,
        } = request;

        let results = state
            .comparator
            .dispatch(&prompt, &models, &user_key, &state.catalog)
            .await;

        tracing::info!(
            models = results.len(),
            failures = results.failures(),
            "Comparison finished"
        );
        results
    }
    .instrument(span)
    .await;

    Ok(Json(CompareResponse { results }))
}
