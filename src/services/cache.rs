use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use crate::core::Matcher;
use crate::models::{BusinessProfile, MatchResult, Opportunity};

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// In-process cache of match results
///
/// Scoring is deterministic, so a result can be reused for as long as the
/// profile, the opportunity and the matcher configuration are unchanged.
pub struct ResultCache {
    results: moka::future::Cache<String, MatchResult>,
}

impl ResultCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let results = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { results }
    }

    /// Return the cached result for this pair or score and store it
    pub async fn get_or_score(
        &self,
        matcher: &Matcher,
        profile: &BusinessProfile,
        opportunity: &Opportunity,
    ) -> MatchResult {
        let key = match CacheKey::match_result(matcher, profile, opportunity) {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!("Failed to build cache key for {}, scoring uncached: {}", opportunity.id, e);
                return matcher.score(profile, opportunity);
            }
        };

        if let Some(result) = self.results.get(&key).await {
            tracing::trace!("Result cache hit: {}", opportunity.id);
            return result;
        }

        let result = matcher.score(profile, opportunity);
        self.results.insert(key, result.clone()).await;
        result
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.results.entry_count(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Key for one (profile, opportunity) pair under a given matcher configuration
    ///
    /// The key embeds the full serialized inputs, so distinct inputs never share an entry.
    pub fn match_result(
        matcher: &Matcher,
        profile: &BusinessProfile,
        opportunity: &Opportunity,
    ) -> Result<String, CacheError> {
        let inputs = serde_json::to_string(&(matcher.weights(), matcher.thresholds(), profile, opportunity))?;
        Ok(format!("match:{}", inputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoringWeights;

    fn create_opportunity(id: &str) -> Opportunity {
        Opportunity {
            id: id.to_string(),
            title: "Small UAS Navigation Without GPS".to_string(),
            agency: "Navy".to_string(),
            budget: Some(150_000.0),
            keywords: ["autonomy".to_string(), "navigation".to_string()].into_iter().collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_cached_result_matches_fresh_score() {
        let cache = ResultCache::new(100, 60);
        let matcher = Matcher::with_default_weights();
        let profile = BusinessProfile::default();
        let opportunity = create_opportunity("N24-042");

        let first = cache.get_or_score(&matcher, &profile, &opportunity).await;
        let second = cache.get_or_score(&matcher, &profile, &opportunity).await;

        assert_eq!(first, second);
        assert_eq!(first, matcher.score(&profile, &opportunity));
    }

    #[test]
    fn test_cache_key_depends_on_inputs() {
        let matcher = Matcher::with_default_weights();
        let profile = BusinessProfile::default();

        let a = CacheKey::match_result(&matcher, &profile, &create_opportunity("A")).unwrap();
        let a_again = CacheKey::match_result(&matcher, &profile, &create_opportunity("A")).unwrap();
        let b = CacheKey::match_result(&matcher, &profile, &create_opportunity("B")).unwrap();
        assert_eq!(a, a_again);
        assert_ne!(a, b);

        let tuned = matcher
            .with_weights(ScoringWeights {
                risk_tolerance: 0.10,
                competitive_advantage: 0.10,
                ..ScoringWeights::default()
            })
            .unwrap();
        let a_tuned = CacheKey::match_result(&tuned, &profile, &create_opportunity("A")).unwrap();
        assert_ne!(a, a_tuned);
    }

    #[test]
    fn test_distinct_inputs_never_share_an_entry() {
        tokio_test::block_on(async {
            let cache = ResultCache::new(100, 60);
            let matcher = Matcher::with_default_weights();
            let profile = BusinessProfile {
                agencies_worked_with: ["navy".to_string()].into_iter().collect(),
                ..Default::default()
            };
            let navy = create_opportunity("A");
            let army = Opportunity {
                agency: "Army".to_string(),
                ..create_opportunity("A")
            };

            let navy_result = cache.get_or_score(&matcher, &profile, &navy).await;
            let army_result = cache.get_or_score(&matcher, &profile, &army).await;
            cache.results.run_pending_tasks().await;

            assert_eq!(navy_result.factor_scores.experience_match, 0.8);
            assert_eq!(army_result.factor_scores.experience_match, 0.4);
            assert_eq!(cache.stats().entries, 2);
        });
    }
}
