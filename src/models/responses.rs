use serde::{Deserialize, Serialize};
use crate::models::domain::{MatchResult, ScoringWeights, TierSummary, TierThresholds};

/// Response for the rank endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub request_id: String,
    pub matches: Vec<MatchResult>,
    pub summary: TierSummary,
    pub total_results: usize,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

/// Active scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfigResponse {
    pub weights: ScoringWeights,
    pub thresholds: TierThresholds,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
