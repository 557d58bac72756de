// Core algorithm exports
pub mod factors;
pub mod matcher;
pub mod reasoning;
pub mod scoring;

pub use factors::{match_keywords, unmatched_keywords, KeywordMatch, KeywordStrength};
pub use matcher::{rank_opportunities, rank_results, MatchError, Matcher, RankedMatches};
pub use scoring::{calculate_match_score, classify, estimate_confidence, weighted_total};
