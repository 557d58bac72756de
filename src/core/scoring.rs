use crate::core::{
    factors,
    reasoning::{explain, identify_opportunities, identify_risk_factors},
};
use crate::models::{
    BusinessProfile, Confidence, FactorScores, MatchResult, Opportunity, RecommendationTier,
    ScoringWeights, TierThresholds,
};

/// Absorbs dot-product rounding so an engineered total of 0.8 stays in the 0.8 tier
const TIER_EPSILON: f64 = 1e-9;

/// Agencies a profile must list, beyond this count, for high confidence
const HIGH_CONFIDENCE_AGENCY_COUNT: usize = 2;

/// Score one opportunity against a profile
///
/// Scoring formula:
/// total = (
///     technical_alignment * 0.35 +     # Opportunity keywords containing tech tags
///     experience_match * 0.25 +        # Prior work with the issuing agency
///     risk_tolerance * 0.15 +          # Company risk appetite
///     budget_fit * 0.10 +              # Budget within preferred contract size
///     strategic_value * 0.10 +         # Breadth of innovation areas
///     competitive_advantage * 0.05     # Secret-or-higher clearance
/// )
/// with the weights taken from `weights`.
pub fn calculate_match_score(
    profile: &BusinessProfile,
    opportunity: &Opportunity,
    weights: &ScoringWeights,
    thresholds: &TierThresholds,
) -> MatchResult {
    let keyword_matches = factors::match_keywords(profile, opportunity);

    let factor_scores = FactorScores {
        technical_alignment: factors::technical_alignment_from(&keyword_matches),
        experience_match: factors::experience_match(profile, opportunity),
        risk_tolerance: factors::risk_tolerance(profile),
        budget_fit: factors::budget_fit(profile, opportunity),
        strategic_value: factors::strategic_value(profile),
        competitive_advantage: factors::competitive_advantage(profile),
    }
    .clamped();

    let total_score = weighted_total(&factor_scores, weights);
    let gaps = factors::unmatched_keywords(opportunity, &keyword_matches);

    MatchResult {
        opportunity_id: opportunity.id.clone(),
        title: opportunity.title.clone(),
        total_score,
        factor_scores,
        recommendation_tier: classify(total_score, thresholds),
        confidence: estimate_confidence(profile),
        reasoning: explain(&factor_scores, &keyword_matches),
        risk_factors: identify_risk_factors(&gaps),
        opportunities: identify_opportunities(profile, opportunity, &gaps),
    }
}

/// Dot product of factor scores and weights
#[inline]
pub fn weighted_total(scores: &FactorScores, weights: &ScoringWeights) -> f64 {
    let total: f64 = scores
        .iter()
        .map(|(factor, score)| score * weights.get(factor))
        .sum();

    // Validated weights may exceed 1.0 by the sum tolerance
    total.clamp(0.0, 1.0)
}

/// Map a total score onto the tier ladder, highest band first
#[inline]
pub fn classify(total_score: f64, thresholds: &TierThresholds) -> RecommendationTier {
    let reaches = |threshold: f64| total_score + TIER_EPSILON >= threshold;

    if reaches(thresholds.highly_recommended) {
        RecommendationTier::HighlyRecommended
    } else if reaches(thresholds.recommended) {
        RecommendationTier::Recommended
    } else if reaches(thresholds.conditional) {
        RecommendationTier::Conditional
    } else {
        RecommendationTier::NotRecommended
    }
}

#[inline]
pub fn estimate_confidence(profile: &BusinessProfile) -> Confidence {
    if profile.agencies_worked_with.len() > HIGH_CONFIDENCE_AGENCY_COUNT {
        Confidence::High
    } else {
        Confidence::Medium
    }
}
