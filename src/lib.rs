//! Opportunity Matcher - explainable matching of business profiles against contracting opportunities
//!
//! This library scores each opportunity on six independent factors, combines them
//! with validated weights, labels the total with a recommendation tier and a
//! confidence level, and ranks the results.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{rank_opportunities, MatchError, Matcher, RankedMatches};
pub use models::{
    BusinessProfile, Confidence, FactorScores, MatchResult, Opportunity, RankRequest, RankResponse,
    RecommendationTier, ScoringWeights, TierSummary, TierThresholds,
};
