use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use crate::core::{MatchError, Matcher};
use crate::models::{ScoringWeights, TierThresholds};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

impl ScoringSettings {
    pub fn weights(&self) -> ScoringWeights {
        ScoringWeights {
            technical_alignment: self.weights.technical_alignment,
            experience_match: self.weights.experience_match,
            risk_tolerance: self.weights.risk_tolerance,
            budget_fit: self.weights.budget_fit,
            strategic_value: self.weights.strategic_value,
            competitive_advantage: self.weights.competitive_advantage,
        }
    }

    pub fn thresholds(&self) -> TierThresholds {
        TierThresholds {
            highly_recommended: self.thresholds.highly_recommended,
            recommended: self.thresholds.recommended,
            conditional: self.thresholds.conditional,
        }
    }

    /// Build a matcher from the configured weights and thresholds, validating both
    pub fn build_matcher(&self) -> Result<Matcher, MatchError> {
        Matcher::new(self.weights(), self.thresholds())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_technical_alignment_weight")]
    pub technical_alignment: f64,
    #[serde(default = "default_experience_match_weight")]
    pub experience_match: f64,
    #[serde(default = "default_risk_tolerance_weight")]
    pub risk_tolerance: f64,
    #[serde(default = "default_budget_fit_weight")]
    pub budget_fit: f64,
    #[serde(default = "default_strategic_value_weight")]
    pub strategic_value: f64,
    #[serde(default = "default_competitive_advantage_weight")]
    pub competitive_advantage: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            technical_alignment: default_technical_alignment_weight(),
            experience_match: default_experience_match_weight(),
            risk_tolerance: default_risk_tolerance_weight(),
            budget_fit: default_budget_fit_weight(),
            strategic_value: default_strategic_value_weight(),
            competitive_advantage: default_competitive_advantage_weight(),
        }
    }
}

fn default_technical_alignment_weight() -> f64 { 0.35 }
fn default_experience_match_weight() -> f64 { 0.25 }
fn default_risk_tolerance_weight() -> f64 { 0.15 }
fn default_budget_fit_weight() -> f64 { 0.10 }
fn default_strategic_value_weight() -> f64 { 0.10 }
fn default_competitive_advantage_weight() -> f64 { 0.05 }

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_highly_recommended")]
    pub highly_recommended: f64,
    #[serde(default = "default_recommended")]
    pub recommended: f64,
    #[serde(default = "default_conditional")]
    pub conditional: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            highly_recommended: default_highly_recommended(),
            recommended: default_recommended(),
            conditional: default_conditional(),
        }
    }
}

fn default_highly_recommended() -> f64 { 0.8 }
fn default_recommended() -> f64 { 0.6 }
fn default_conditional() -> f64 { 0.4 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_enabled() -> bool { true }
fn default_cache_capacity() -> u64 { 10_000 }
fn default_cache_ttl() -> u64 { 300 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// `LOG_LEVEL` and `LOG_FORMAT` take precedence over the configured values
    pub fn with_env_overrides(self) -> Self {
        self.overridden_by(env::var("LOG_LEVEL").ok(), env::var("LOG_FORMAT").ok())
    }

    fn overridden_by(self, level: Option<String>, format: Option<String>) -> Self {
        Self {
            level: level.unwrap_or(self.level),
            format: format.unwrap_or(self.format),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with OPPMATCH)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., OPPMATCH__SCORING__WEIGHTS__BUDGET_FIT -> scoring.weights.budget_fit
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("OPPMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.technical_alignment, 0.35);
        assert_eq!(weights.experience_match, 0.25);
        assert_eq!(weights.risk_tolerance, 0.15);
        assert_eq!(weights.budget_fit, 0.10);
        assert_eq!(weights.strategic_value, 0.10);
        assert_eq!(weights.competitive_advantage, 0.05);
    }

    #[test]
    fn test_default_settings_build_matcher() {
        let settings = Settings::default();
        let matcher = settings.scoring.build_matcher().unwrap();
        assert_eq!(matcher.weights(), &ScoringWeights::default());
        assert_eq!(matcher.thresholds(), &TierThresholds::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "compact");
    }

    #[test]
    fn test_log_env_overrides_configured_values() {
        let configured = LoggingSettings {
            level: "warn".to_string(),
            format: "compact".to_string(),
        };

        let overridden = configured
            .clone()
            .overridden_by(Some("debug".to_string()), Some("pretty".to_string()));
        assert_eq!(overridden.level, "debug");
        assert_eq!(overridden.format, "pretty");

        let untouched = configured.overridden_by(None, None);
        assert_eq!(untouched.level, "warn");
        assert_eq!(untouched.format, "compact");
    }

    #[test]
    fn test_misconfigured_weights_fail_fast() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "[scoring.weights]\ntechnical_alignment = 0.5\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.scoring.weights.technical_alignment, 0.5);
        assert_eq!(settings.scoring.weights.experience_match, 0.25);
        assert!(settings.scoring.build_matcher().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(
                "[server]\nport = 9090\n[cache]\nenabled = false\n",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert!(!settings.cache.enabled);
        assert_eq!(settings.logging.level, "info");
    }
}
