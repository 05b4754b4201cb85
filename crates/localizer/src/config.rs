use locator_context_budget::BudgetConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fan-out, retrieval and budget settings for one localization run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizerConfig {
    /// Semantic search hits appended per feature
    pub top_k: usize,
    pub min_score: f32,
    /// Simultaneous per-feature pipelines
    pub max_concurrency: usize,
    pub max_block_chars: usize,
    pub max_total_chars: usize,
    /// Content characters shown per semantic search hit
    pub relevant_excerpt_chars: usize,
    /// End-to-end budget for `generate_report`
    pub request_timeout_secs: u64,
    pub feature_temperature: f32,
    pub localization_temperature: f32,
    pub plan_temperature: f32,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        let budget = BudgetConfig::default();
        Self {
            top_k: 5,
            min_score: 0.3,
            max_concurrency: 10,
            max_block_chars: budget.max_block_chars,
            max_total_chars: budget.max_total_chars,
            relevant_excerpt_chars: 300,
            request_timeout_secs: 300,
            feature_temperature: 0.3,
            localization_temperature: 0.3,
            plan_temperature: 0.5,
        }
    }
}

impl LocalizerConfig {
    #[must_use]
    pub fn budget(&self) -> BudgetConfig {
        BudgetConfig::with_limits(self.max_block_chars, self.max_total_chars)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("max_concurrency must be > 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err("min_score must be within 0.0..=1.0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be > 0".to_string());
        }
        self.budget().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LocalizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_k, 5);
        assert_eq!(config.max_concurrency, 10);
        assert_eq!(config.request_timeout(), Duration::from_secs(300));
        assert_eq!(config.budget().max_block_chars, 1000);
    }

    #[test]
    fn test_validation() {
        let config = LocalizerConfig {
            max_concurrency: 0,
            ..LocalizerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = LocalizerConfig {
            min_score: 1.5,
            ..LocalizerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
