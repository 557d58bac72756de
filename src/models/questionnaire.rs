//! Onboarding questionnaire responses.
//!
//! The onboarding form groups answers by section. Each section is optional;
//! whatever is missing becomes an empty tag set or an unknown enum value once
//! converted into a [`BusinessProfile`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::domain::{deserialize_tags, BusinessProfile, ClearanceLevel, ContractSize, RiskTolerance};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionnaireResponses {
    #[serde(default, alias = "company")]
    pub company_name: Option<String>,
    #[serde(default)]
    pub technical_capabilities: TechnicalCapabilities,
    #[serde(default)]
    pub agency_experience: AgencyExperience,
    #[serde(default)]
    pub business_preferences: BusinessPreferences,
    #[serde(default)]
    pub team_capabilities: TeamCapabilities,
    #[serde(default)]
    pub innovation_profile: InnovationProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicalCapabilities {
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub primary_tech_areas: BTreeSet<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub secondary_tech_areas: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgencyExperience {
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub agencies_worked_with: BTreeSet<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub contract_types: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessPreferences {
    #[serde(default)]
    pub preferred_contract_size: ContractSize,
    #[serde(default)]
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub timeline_preference: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamCapabilities {
    #[serde(default)]
    pub clearance_level: ClearanceLevel,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub certifications: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InnovationProfile {
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub innovation_areas: BTreeSet<String>,
    #[serde(default)]
    pub competitive_advantages: Option<String>,
}

impl From<QuestionnaireResponses> for BusinessProfile {
    fn from(responses: QuestionnaireResponses) -> Self {
        let competitive_advantages = responses
            .innovation_profile
            .competitive_advantages
            .filter(|text| !text.trim().is_empty());

        BusinessProfile {
            company_name: responses.company_name,
            primary_tech_areas: responses.technical_capabilities.primary_tech_areas,
            secondary_tech_areas: responses.technical_capabilities.secondary_tech_areas,
            agencies_worked_with: responses.agency_experience.agencies_worked_with,
            contract_types: responses.agency_experience.contract_types,
            preferred_contract_size: responses.business_preferences.preferred_contract_size,
            risk_tolerance: responses.business_preferences.risk_tolerance,
            clearance_level: responses.team_capabilities.clearance_level,
            innovation_areas: responses.innovation_profile.innovation_areas,
            certifications: responses.team_capabilities.certifications,
            timeline_preference: responses.business_preferences.timeline_preference,
            competitive_advantages,
        }
    }
}
