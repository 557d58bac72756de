use thiserror::Error;
use crate::models::{
    BusinessProfile, MatchResult, Opportunity, ScoringWeights, TierSummary, TierThresholds,
    WeightsError,
};
use crate::core::scoring::calculate_match_score;

/// Errors raised at the matcher boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchError {
    #[error("invalid scoring configuration: {0}")]
    InvalidConfiguration(#[from] WeightsError),
}

/// Ranked results plus per-tier counts
#[derive(Debug, Clone)]
pub struct RankedMatches {
    pub matches: Vec<MatchResult>,
    pub summary: TierSummary,
}

/// Main matching orchestrator
///
/// Holds only validated, immutable configuration, so a single instance can be
/// shared across threads and reused for any number of profiles.
///
/// # Pipeline Stages
/// 1. Factor scoring
/// 2. Weighted aggregation
/// 3. Tier classification and confidence
/// 4. Stable ranking
#[derive(Debug, Clone, PartialEq)]
pub struct Matcher {
    weights: ScoringWeights,
    thresholds: TierThresholds,
}

impl Matcher {
    /// Build a matcher, rejecting weights that do not sum to 1.0 and unordered thresholds
    pub fn new(weights: ScoringWeights, thresholds: TierThresholds) -> Result<Self, MatchError> {
        weights.validate()?;
        thresholds.validate()?;
        Ok(Self { weights, thresholds })
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            thresholds: TierThresholds::default(),
        }
    }

    /// Same thresholds, different weights
    pub fn with_weights(&self, weights: ScoringWeights) -> Result<Self, MatchError> {
        Self::new(weights, self.thresholds)
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    /// Score a single opportunity
    pub fn score(&self, profile: &BusinessProfile, opportunity: &Opportunity) -> MatchResult {
        let result = calculate_match_score(profile, opportunity, &self.weights, &self.thresholds);

        tracing::debug!(
            "Scored opportunity {}: {:.3} ({})",
            result.opportunity_id,
            result.total_score,
            result.recommendation_tier
        );

        result
    }

    /// Score every opportunity and order the results by descending total score
    ///
    /// Duplicates are scored independently and equal scores keep their input order.
    pub fn rank(&self, profile: &BusinessProfile, opportunities: &[Opportunity]) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = opportunities
            .iter()
            .map(|opportunity| self.score(profile, opportunity))
            .collect();

        rank_results(&mut results);

        tracing::info!(
            "Ranked {} opportunities for {}, top score: {:.3}",
            results.len(),
            profile.company_name.as_deref().unwrap_or("company"),
            results.first().map(|r| r.total_score).unwrap_or(0.0)
        );

        results
    }

    pub fn rank_with_summary(
        &self,
        profile: &BusinessProfile,
        opportunities: &[Opportunity],
    ) -> RankedMatches {
        let matches = self.rank(profile, opportunities);
        let summary = TierSummary::from_results(&matches);
        RankedMatches { matches, summary }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Sort descending by total score. `sort_by` is stable, so ties keep input order.
pub fn rank_results(results: &mut [MatchResult]) {
    results.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
}

/// Validate `weights`, then rank `opportunities` for `profile` with the default tier thresholds
pub fn rank_opportunities(
    profile: &BusinessProfile,
    opportunities: &[Opportunity],
    weights: &ScoringWeights,
) -> Result<Vec<MatchResult>, MatchError> {
    let matcher = Matcher::new(*weights, TierThresholds::default())?;
    Ok(matcher.rank(profile, opportunities))
}
