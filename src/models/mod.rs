// Model exports
pub mod domain;
pub mod questionnaire;
pub mod requests;
pub mod responses;

pub use domain::{
    normalize_agency, BusinessProfile, ClearanceLevel, Confidence, ContractSize, Factor, FactorScores,
    MatchResult, Opportunity, RecommendationTier, RiskTolerance, ScoringWeights, TierSummary, TierThresholds,
    WeightsError, DEFAULT_BUDGET, NONE_SENTINEL, WEIGHT_SUM_TOLERANCE,
};
pub use questionnaire::QuestionnaireResponses;
pub use requests::{RankRequest, ScoreRequest};
pub use responses::{ErrorResponse, HealthResponse, RankResponse, ScoringConfigResponse};
