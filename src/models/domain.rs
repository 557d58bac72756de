use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Budget assumed for opportunities that carry no usable budget
pub const DEFAULT_BUDGET: f64 = 250_000.0;

/// Tag meaning "no entries" in questionnaire multi-selects
pub const NONE_SENTINEL: &str = "none";

/// Allowed drift of the weight sum away from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Errors raised while validating scoring configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("scoring weights must sum to 1.0, got {sum:.6}")]
    InvalidSum { sum: f64 },

    #[error("weight for {factor} must be finite and non-negative, got {value}")]
    InvalidWeight { factor: Factor, value: f64 },

    #[error("unknown scoring factor: {0}")]
    UnknownFactor(String),

    #[error("missing weight for scoring factor: {0}")]
    MissingFactor(Factor),

    #[error("weight for scoring factor {0} given more than once")]
    DuplicateFactor(Factor),

    #[error(
        "tier thresholds must be strictly descending within [0, 1], got {highly_recommended}/{recommended}/{conditional}"
    )]
    InvalidThresholds {
        highly_recommended: f64,
        recommended: f64,
        conditional: f64,
    },
}

/// Business capability profile, usually derived from questionnaire answers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    #[serde(default, alias = "company_name", skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, alias = "primary_tech_areas", deserialize_with = "deserialize_tags")]
    pub primary_tech_areas: BTreeSet<String>,
    #[serde(default, alias = "secondary_tech_areas", deserialize_with = "deserialize_tags")]
    pub secondary_tech_areas: BTreeSet<String>,
    #[serde(default, alias = "agencies_worked_with", deserialize_with = "deserialize_tags")]
    pub agencies_worked_with: BTreeSet<String>,
    #[serde(default, alias = "contract_types", deserialize_with = "deserialize_tags")]
    pub contract_types: BTreeSet<String>,
    #[serde(default, alias = "preferred_contract_size")]
    pub preferred_contract_size: ContractSize,
    #[serde(default, alias = "risk_tolerance")]
    pub risk_tolerance: RiskTolerance,
    #[serde(default, alias = "clearance_level")]
    pub clearance_level: ClearanceLevel,
    #[serde(default, alias = "innovation_areas", deserialize_with = "deserialize_tags")]
    pub innovation_areas: BTreeSet<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub certifications: BTreeSet<String>,
    #[serde(default, alias = "timeline_preference", skip_serializing_if = "Option::is_none")]
    pub timeline_preference: Option<String>,
    /// Free text, carried through but never scored
    #[serde(default, alias = "competitive_advantages", skip_serializing_if = "Option::is_none")]
    pub competitive_advantages: Option<String>,
}

impl BusinessProfile {
    /// True when the agency list holds real entries rather than nothing or the `none` sentinel
    pub fn has_agency_experience(&self) -> bool {
        !self.agencies_worked_with.is_empty()
            && !self
                .agencies_worked_with
                .iter()
                .any(|agency| normalize_agency(agency) == NONE_SENTINEL)
    }

    /// Whether the profile lists `agency` after normalization
    pub fn worked_with(&self, agency: &str) -> bool {
        let wanted = normalize_agency(agency);
        if wanted.is_empty() || wanted == NONE_SENTINEL {
            return false;
        }
        self.agencies_worked_with
            .iter()
            .any(|known| normalize_agency(known) == wanted)
    }
}

/// Normalize an agency name: trimmed, lower-case, whitespace runs become underscores
pub fn normalize_agency(agency: &str) -> String {
    agency
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// A single contracting solicitation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    #[serde(default, alias = "topic_id", alias = "topicId")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "component")]
    pub agency: String,
    #[serde(default, deserialize_with = "deserialize_budget", skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub keywords: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Opportunity {
    /// Budget used for scoring, falling back to [`DEFAULT_BUDGET`]
    pub fn effective_budget(&self) -> f64 {
        self.budget
            .filter(|budget| budget.is_finite() && *budget >= 0.0)
            .unwrap_or(DEFAULT_BUDGET)
    }
}

/// Preferred contract size bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ContractSize {
    #[serde(rename = "under_150k")]
    Under150k,
    #[serde(rename = "150k_250k")]
    From150kTo250k,
    #[serde(rename = "250k_plus")]
    Over250k,
    #[serde(rename = "any")]
    Any,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl FromStr for ContractSize {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize_enum(s).as_str() {
            "under_150k" => Self::Under150k,
            "150k_250k" => Self::From150kTo250k,
            "250k_plus" => Self::Over250k,
            "any" => Self::Any,
            _ => Self::Unknown,
        })
    }
}

/// Company appetite for technical and programmatic risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
    #[default]
    Unknown,
}

impl FromStr for RiskTolerance {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize_enum(s).as_str() {
            "conservative" => Self::Conservative,
            "moderate" => Self::Moderate,
            "aggressive" => Self::Aggressive,
            _ => Self::Unknown,
        })
    }
}

/// Highest personnel security clearance held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearanceLevel {
    None,
    PublicTrust,
    Secret,
    TopSecret,
    TsSci,
    #[default]
    Unknown,
}

impl ClearanceLevel {
    /// Secret and above
    pub fn is_classified(&self) -> bool {
        matches!(self, Self::Secret | Self::TopSecret | Self::TsSci)
    }
}

impl FromStr for ClearanceLevel {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize_enum(s).as_str() {
            "none" => Self::None,
            "public_trust" => Self::PublicTrust,
            "secret" => Self::Secret,
            "top_secret" => Self::TopSecret,
            "ts_sci" => Self::TsSci,
            _ => Self::Unknown,
        })
    }
}

macro_rules! lenient_enum_deserialize {
    ($($ty:ty),*) => {
        $(
            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
                where
                    D: Deserializer<'de>,
                {
                    deserialize_lenient_enum(deserializer)
                }
            }
        )*
    };
}

lenient_enum_deserialize!(ContractSize, RiskTolerance, ClearanceLevel);

fn normalize_enum(value: &str) -> String {
    value.trim().to_lowercase().replace(['-', ' '], "_")
}

/// Strings map through `FromStr`; null, numbers and other shapes fall back to the default variant
fn deserialize_lenient_enum<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = Infallible> + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.parse().unwrap_or_default(),
        _ => T::default(),
    })
}

/// Accepts an array of strings, a single (optionally comma separated) string, or null
pub(crate) fn deserialize_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let raw: Vec<String> = match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    Ok(raw
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}

/// Numbers pass through; numeric strings such as "$275,000" are parsed; anything else is absent
fn deserialize_budget<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '_') && !c.is_whitespace())
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }
    .filter(|budget| budget.is_finite() && *budget >= 0.0))
}

/// The six dimensions of fit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    TechnicalAlignment,
    ExperienceMatch,
    RiskTolerance,
    BudgetFit,
    StrategicValue,
    CompetitiveAdvantage,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::TechnicalAlignment,
        Factor::ExperienceMatch,
        Factor::RiskTolerance,
        Factor::BudgetFit,
        Factor::StrategicValue,
        Factor::CompetitiveAdvantage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::TechnicalAlignment => "technicalAlignment",
            Factor::ExperienceMatch => "experienceMatch",
            Factor::RiskTolerance => "riskTolerance",
            Factor::BudgetFit => "budgetFit",
            Factor::StrategicValue => "strategicValue",
            Factor::CompetitiveAdvantage => "competitiveAdvantage",
        }
    }

    /// Parse a factor name given in camelCase or snake_case
    pub fn from_name(name: &str) -> Option<Self> {
        let folded: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_lowercase();
        Factor::ALL
            .into_iter()
            .find(|factor| factor.as_str().to_lowercase() == folded)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-factor scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScores {
    pub technical_alignment: f64,
    pub experience_match: f64,
    pub risk_tolerance: f64,
    pub budget_fit: f64,
    pub strategic_value: f64,
    pub competitive_advantage: f64,
}

impl FactorScores {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::TechnicalAlignment => self.technical_alignment,
            Factor::ExperienceMatch => self.experience_match,
            Factor::RiskTolerance => self.risk_tolerance,
            Factor::BudgetFit => self.budget_fit,
            Factor::StrategicValue => self.strategic_value,
            Factor::CompetitiveAdvantage => self.competitive_advantage,
        }
    }

    /// Clamp every score into [0, 1]
    pub fn clamped(self) -> Self {
        let unit = |score: f64| if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self {
            technical_alignment: unit(self.technical_alignment),
            experience_match: unit(self.experience_match),
            risk_tolerance: unit(self.risk_tolerance),
            budget_fit: unit(self.budget_fit),
            strategic_value: unit(self.strategic_value),
            competitive_advantage: unit(self.competitive_advantage),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.into_iter().map(move |factor| (factor, self.get(factor)))
    }
}

/// Scoring weights, one per factor, summing to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringWeights {
    pub technical_alignment: f64,
    pub experience_match: f64,
    pub risk_tolerance: f64,
    pub budget_fit: f64,
    pub strategic_value: f64,
    pub competitive_advantage: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            technical_alignment: 0.35,
            experience_match: 0.25,
            risk_tolerance: 0.15,
            budget_fit: 0.10,
            strategic_value: 0.10,
            competitive_advantage: 0.05,
        }
    }
}

impl ScoringWeights {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::TechnicalAlignment => self.technical_alignment,
            Factor::ExperienceMatch => self.experience_match,
            Factor::RiskTolerance => self.risk_tolerance,
            Factor::BudgetFit => self.budget_fit,
            Factor::StrategicValue => self.strategic_value,
            Factor::CompetitiveAdvantage => self.competitive_advantage,
        }
    }

    fn slot(&mut self, factor: Factor) -> &mut f64 {
        match factor {
            Factor::TechnicalAlignment => &mut self.technical_alignment,
            Factor::ExperienceMatch => &mut self.experience_match,
            Factor::RiskTolerance => &mut self.risk_tolerance,
            Factor::BudgetFit => &mut self.budget_fit,
            Factor::StrategicValue => &mut self.strategic_value,
            Factor::CompetitiveAdvantage => &mut self.competitive_advantage,
        }
    }

    pub fn sum(&self) -> f64 {
        Factor::ALL.iter().map(|factor| self.get(*factor)).sum()
    }

    /// Reject negative or non-finite weights and sums away from 1.0. Never renormalizes.
    pub fn validate(&self) -> Result<(), WeightsError> {
        for factor in Factor::ALL {
            let value = self.get(factor);
            if !value.is_finite() || value < 0.0 {
                return Err(WeightsError::InvalidWeight { factor, value });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightsError::InvalidSum { sum });
        }

        Ok(())
    }

    /// Build validated weights from a factor-name map; all six factors are required
    pub fn from_map<I, K>(entries: I) -> Result<Self, WeightsError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut weights = Self {
            technical_alignment: 0.0,
            experience_match: 0.0,
            risk_tolerance: 0.0,
            budget_fit: 0.0,
            strategic_value: 0.0,
            competitive_advantage: 0.0,
        };
        let mut seen = BTreeSet::new();

        for (name, value) in entries {
            let name = name.as_ref();
            let factor = Factor::from_name(name)
                .ok_or_else(|| WeightsError::UnknownFactor(name.to_string()))?;
            if !seen.insert(factor) {
                return Err(WeightsError::DuplicateFactor(factor));
            }
            *weights.slot(factor) = value;
        }

        if let Some(missing) = Factor::ALL.into_iter().find(|factor| !seen.contains(factor)) {
            return Err(WeightsError::MissingFactor(missing));
        }

        weights.validate()?;
        Ok(weights)
    }
}

/// Lower bounds of the recommendation tiers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierThresholds {
    pub highly_recommended: f64,
    pub recommended: f64,
    pub conditional: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            highly_recommended: 0.8,
            recommended: 0.6,
            conditional: 0.4,
        }
    }
}

impl TierThresholds {
    pub fn validate(&self) -> Result<(), WeightsError> {
        let in_unit = |value: f64| value.is_finite() && (0.0..=1.0).contains(&value);
        let ordered = self.highly_recommended > self.recommended && self.recommended > self.conditional;

        if in_unit(self.highly_recommended) && in_unit(self.recommended) && in_unit(self.conditional) && ordered {
            Ok(())
        } else {
            Err(WeightsError::InvalidThresholds {
                highly_recommended: self.highly_recommended,
                recommended: self.recommended,
                conditional: self.conditional,
            })
        }
    }
}

/// Recommendation band derived from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecommendationTier {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Conditional")]
    Conditional,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
}

impl RecommendationTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighlyRecommended => "Highly Recommended",
            Self::Recommended => "Recommended",
            Self::Conditional => "Conditional",
            Self::NotRecommended => "Not Recommended",
        }
    }

    /// Suggested next step for a bid/no-bid decision
    pub fn action(&self) -> &'static str {
        match self {
            Self::HighlyRecommended => "Strongly consider pursuing this opportunity",
            Self::Recommended => "Good fit - worth detailed evaluation",
            Self::Conditional => "Consider if strategic or with teaming partners",
            Self::NotRecommended => "Low match - focus on better aligned opportunities",
        }
    }

    pub fn priority(&self) -> &'static str {
        match self {
            Self::HighlyRecommended => "high",
            Self::Recommended => "medium",
            Self::Conditional => "low",
            Self::NotRecommended => "very_low",
        }
    }
}

impl fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How much agency history backs a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

/// Outcome of scoring one opportunity against one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub opportunity_id: String,
    pub title: String,
    pub total_score: f64,
    pub factor_scores: FactorScores,
    pub recommendation_tier: RecommendationTier,
    pub confidence: Confidence,
    pub reasoning: Vec<String>,
    /// Concerns worth checking before a bid, such as uncovered requirements
    #[serde(default)]
    pub risk_factors: Vec<String>,
    /// Angles the company could exploit
    #[serde(default)]
    pub opportunities: Vec<String>,
}

/// Count of ranked results per recommendation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierSummary {
    pub total: usize,
    pub highly_recommended: usize,
    pub recommended: usize,
    pub conditional: usize,
    pub not_recommended: usize,
}

impl TierSummary {
    pub fn from_results(results: &[MatchResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.total += 1;
            match result.recommendation_tier {
                RecommendationTier::HighlyRecommended => summary.highly_recommended += 1,
                RecommendationTier::Recommended => summary.recommended += 1,
                RecommendationTier::Conditional => summary.conditional += 1,
                RecommendationTier::NotRecommended => summary.not_recommended += 1,
            }
            summary
        })
    }
}
