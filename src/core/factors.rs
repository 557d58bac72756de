use std::collections::BTreeSet;
use crate::models::{BusinessProfile, ContractSize, Opportunity, RiskTolerance};

/// Credit for a keyword containing a primary tech tag
pub const PRIMARY_KEYWORD_CREDIT: f64 = 0.3;
/// Credit for a keyword containing only a secondary tech tag
pub const SECONDARY_KEYWORD_CREDIT: f64 = 0.1;

const SMALL_CONTRACT_CEILING: f64 = 150_000.0;
const MID_CONTRACT_CEILING: f64 = 250_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordStrength {
    Primary,
    Secondary,
}

impl KeywordStrength {
    pub fn credit(&self) -> f64 {
        match self {
            KeywordStrength::Primary => PRIMARY_KEYWORD_CREDIT,
            KeywordStrength::Secondary => SECONDARY_KEYWORD_CREDIT,
        }
    }
}

/// An opportunity keyword that contains one of the profile's tech tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub keyword: String,
    pub strength: KeywordStrength,
}

/// Match every opportunity keyword against the profile's tech tags
///
/// Matching is a case-insensitive substring test of tag within keyword.
/// Primary tags are tried first; a keyword earns at most one match.
pub fn match_keywords(profile: &BusinessProfile, opportunity: &Opportunity) -> Vec<KeywordMatch> {
    let primary = lowered_tags(&profile.primary_tech_areas);
    let secondary = lowered_tags(&profile.secondary_tech_areas);

    opportunity
        .keywords
        .iter()
        .filter_map(|keyword| {
            let lowered = keyword.to_lowercase();
            let hit = |tags: &[String], strength: KeywordStrength| {
                tags.iter()
                    .any(|tag| lowered.contains(tag.as_str()))
                    .then(|| KeywordMatch {
                        keyword: keyword.clone(),
                        strength,
                    })
            };
            hit(primary.as_slice(), KeywordStrength::Primary)
                .or_else(|| hit(secondary.as_slice(), KeywordStrength::Secondary))
        })
        .collect()
}

/// Opportunity keywords no primary or secondary tag covers, in keyword order
pub fn unmatched_keywords<'a>(opportunity: &'a Opportunity, matches: &[KeywordMatch]) -> Vec<&'a str> {
    opportunity
        .keywords
        .iter()
        .filter(|keyword| !matches.iter().any(|m| &m.keyword == *keyword))
        .map(String::as_str)
        .collect()
}

// Blank tags would match every keyword
fn lowered_tags(tags: &BTreeSet<String>) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim().to_lowercase())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Technical alignment (0-1): summed keyword credits, capped at 1.0
pub fn technical_alignment(profile: &BusinessProfile, opportunity: &Opportunity) -> f64 {
    technical_alignment_from(&match_keywords(profile, opportunity))
}

#[inline]
pub fn technical_alignment_from(matches: &[KeywordMatch]) -> f64 {
    let total: f64 = matches.iter().map(|m| m.strength.credit()).sum();
    total.min(1.0)
}

/// Experience match (0-1) from the profile's agency history
#[inline]
pub fn experience_match(profile: &BusinessProfile, opportunity: &Opportunity) -> f64 {
    if profile.worked_with(&opportunity.agency) {
        0.8
    } else if profile.has_agency_experience() {
        0.4
    } else {
        0.1
    }
}

#[inline]
pub fn risk_tolerance(profile: &BusinessProfile) -> f64 {
    match profile.risk_tolerance {
        RiskTolerance::Conservative => 0.3,
        RiskTolerance::Moderate => 0.6,
        RiskTolerance::Aggressive => 0.9,
        RiskTolerance::Unknown => 0.5,
    }
}

/// Budget fit (0-1). A mismatch earns partial credit rather than zero.
#[inline]
pub fn budget_fit(profile: &BusinessProfile, opportunity: &Opportunity) -> f64 {
    let budget = opportunity.effective_budget();
    let fits = match profile.preferred_contract_size {
        ContractSize::Any => true,
        ContractSize::Under150k => budget < SMALL_CONTRACT_CEILING,
        ContractSize::From150kTo250k => {
            (SMALL_CONTRACT_CEILING..=MID_CONTRACT_CEILING).contains(&budget)
        }
        ContractSize::Over250k => budget > MID_CONTRACT_CEILING,
        ContractSize::Unknown => false,
    };

    if fits {
        1.0
    } else {
        0.5
    }
}

/// Strategic value (0-1): breadth of claimed innovation areas, ignoring case
#[inline]
pub fn strategic_value(profile: &BusinessProfile) -> f64 {
    let distinct = lowered_tags(&profile.innovation_areas)
        .into_iter()
        .collect::<BTreeSet<_>>()
        .len();
    (distinct as f64 * 0.3).min(1.0)
}

#[inline]
pub fn competitive_advantage(profile: &BusinessProfile) -> f64 {
    if profile.clearance_level.is_classified() {
        0.8
    } else {
        0.3
    }
}
