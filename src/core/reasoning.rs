use crate::core::factors::{KeywordMatch, KeywordStrength};
use crate::models::{BusinessProfile, FactorScores, Opportunity};

/// Most uncovered keywords still offered as an expansion
const MAX_EXPANSION_KEYWORDS: usize = 2;

/// Build human-readable reasons for a match from its factor scores
///
/// Output order is fixed so that identical inputs produce identical reasoning.
pub fn explain(scores: &FactorScores, keyword_matches: &[KeywordMatch]) -> Vec<String> {
    let mut reasons = Vec::new();

    if scores.technical_alignment > 0.7 {
        reasons.push("Strong technical capability alignment with opportunity requirements".to_string());
    } else if scores.technical_alignment < 0.3 {
        reasons.push("Limited technical alignment - may require capability development".to_string());
    }

    let core_keywords: Vec<&str> = keyword_matches
        .iter()
        .filter(|m| m.strength == KeywordStrength::Primary)
        .map(|m| m.keyword.as_str())
        .collect();
    if !core_keywords.is_empty() {
        reasons.push(format!(
            "Keywords aligned with core competencies: {}",
            core_keywords.join(", ")
        ));
    }

    if scores.experience_match > 0.6 {
        reasons.push("Past performance with the issuing agency".to_string());
    }

    if scores.risk_tolerance < 0.4 {
        reasons.push("Risk level may be outside company comfort zone".to_string());
    }

    if scores.budget_fit < 1.0 {
        reasons.push("Budget falls outside the preferred contract size".to_string());
    }

    if scores.competitive_advantage > 0.6 {
        reasons.push("Security clearance provides a competitive advantage".to_string());
    }

    if reasons.is_empty() {
        reasons.push("Standard match based on available data".to_string());
    }

    reasons
}

/// Requirements the profile does not cover
pub fn identify_risk_factors(gaps: &[&str]) -> Vec<String> {
    if gaps.is_empty() {
        Vec::new()
    } else {
        vec![format!("Technical capability gaps: {}", gaps.join(", "))]
    }
}

/// Existing agency relationships and small capability stretches
pub fn identify_opportunities(
    profile: &BusinessProfile,
    opportunity: &Opportunity,
    gaps: &[&str],
) -> Vec<String> {
    let mut opportunities = Vec::new();

    if profile.worked_with(&opportunity.agency) {
        opportunities.push(format!("Leverage existing {} relationship", opportunity.agency.trim()));
    }

    if (1..=MAX_EXPANSION_KEYWORDS).contains(&gaps.len()) {
        opportunities.push(format!("Opportunity to expand into: {}", gaps.join(", ")));
    }

    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_scores() -> FactorScores {
        FactorScores {
            technical_alignment: 0.5,
            experience_match: 0.4,
            risk_tolerance: 0.5,
            budget_fit: 1.0,
            strategic_value: 0.3,
            competitive_advantage: 0.3,
        }
    }

    fn navy_veteran() -> BusinessProfile {
        BusinessProfile {
            agencies_worked_with: ["navy".to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    fn opportunity_for(agency: &str) -> Opportunity {
        Opportunity {
            id: "N24-042".to_string(),
            agency: agency.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_standard_match_when_nothing_stands_out() {
        let reasons = explain(&neutral_scores(), &[]);
        assert_eq!(reasons, vec!["Standard match based on available data"]);
    }

    #[test]
    fn test_lists_core_keywords() {
        let matches = vec![
            KeywordMatch {
                keyword: "cybersecurity".to_string(),
                strength: KeywordStrength::Primary,
            },
            KeywordMatch {
                keyword: "sensor fusion".to_string(),
                strength: KeywordStrength::Secondary,
            },
        ];

        let reasons = explain(&neutral_scores(), &matches);
        assert!(reasons.contains(&"Keywords aligned with core competencies: cybersecurity".to_string()));
        assert!(!reasons.iter().any(|r| r.contains("sensor fusion")));
    }

    #[test]
    fn test_flags_weak_and_strong_factors() {
        let scores = FactorScores {
            technical_alignment: 0.1,
            experience_match: 0.8,
            risk_tolerance: 0.3,
            budget_fit: 0.5,
            strategic_value: 0.6,
            competitive_advantage: 0.8,
        };

        let reasons = explain(&scores, &[]);
        assert_eq!(reasons.len(), 5);
        assert!(reasons[0].starts_with("Limited technical alignment"));
    }

    #[test]
    fn test_capability_gaps_listed() {
        assert!(identify_risk_factors(&[]).is_empty());
        assert_eq!(
            identify_risk_factors(&["hypersonic", "thermal protection"]),
            vec!["Technical capability gaps: hypersonic, thermal protection"]
        );
    }

    #[test]
    fn test_expansion_only_for_one_or_two_gaps() {
        let profile = BusinessProfile::default();
        let opportunity = opportunity_for("Army");

        assert!(identify_opportunities(&profile, &opportunity, &[]).is_empty());
        assert_eq!(
            identify_opportunities(&profile, &opportunity, &["navigation"]),
            vec!["Opportunity to expand into: navigation"]
        );
        assert_eq!(
            identify_opportunities(&profile, &opportunity, &["navigation", "robotics"]),
            vec!["Opportunity to expand into: navigation, robotics"]
        );
        assert!(identify_opportunities(&profile, &opportunity, &["a", "b", "c"]).is_empty());
    }

    #[test]
    fn test_existing_agency_relationship() {
        let profile = navy_veteran();

        assert_eq!(
            identify_opportunities(&profile, &opportunity_for("Navy"), &[]),
            vec!["Leverage existing Navy relationship"]
        );
        assert!(identify_opportunities(&profile, &opportunity_for("Army"), &[]).is_empty());
    }
}
