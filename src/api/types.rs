//! Request and response types for the comparison API.

use crate::compare::{ComparisonResult, Selections};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub app: &'static str,
    pub version: &'static str,
}

/// Body of `POST /compare`.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub prompt: String,
    pub models: Selections,
    pub user_key: String,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub results: ComparisonResult,
}
