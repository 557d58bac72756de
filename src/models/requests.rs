use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;
use crate::models::domain::{BusinessProfile, Opportunity};

/// Upper bound on opportunities ranked in a single request
pub const MAX_OPPORTUNITIES: usize = 1000;

/// Request to rank opportunities for a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    pub profile: BusinessProfile,
    #[validate(length(max = 1000))]
    #[serde(default)]
    pub opportunities: Vec<Opportunity>,
    #[validate(range(min = 1, max = 1000))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u16>,
    /// Per-request weight override, keyed by factor name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<BTreeMap<String, f64>>,
}

/// Request to score a single opportunity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub profile: BusinessProfile,
    pub opportunity: Opportunity,
}
