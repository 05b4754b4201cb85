use serde::{Deserialize, Serialize};

/// Hard ceiling on chunking recursion, regardless of configuration
pub const MAX_RECURSION_DEPTH: usize = 5;

/// Longest `- [kind] name (lines a-b)` prefix kept in a unit header
pub(crate) const HEADER_PREFIX_MAX_CHARS: usize = 128;

/// Budget and chunking policy for structure rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Largest body emitted verbatim for one definition
    pub max_block_chars: usize,

    /// Character budget for the whole rendering
    pub max_total_chars: usize,

    /// Chunking recursion depth (clamped to [`MAX_RECURSION_DEPTH`])
    pub max_depth: usize,

    /// Line placed after an oversized definition's header when its children follow
    pub truncation_marker: String,

    /// Signature text kept in each header line
    pub signature_max_chars: usize,

    /// Direct children needed before an oversized definition recurses instead of splitting
    pub min_children_for_recursion: usize,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            max_block_chars: 1000,
            max_total_chars: 50_000,
            max_depth: MAX_RECURSION_DEPTH,
            truncation_marker: "    // ... nested definitions listed below".to_string(),
            signature_max_chars: 100,
            min_children_for_recursion: 1,
        }
    }
}

impl BudgetConfig {
    #[must_use]
    pub fn with_limits(max_block_chars: usize, max_total_chars: usize) -> Self {
        Self {
            max_block_chars,
            max_total_chars,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn effective_depth(&self) -> usize {
        self.max_depth.min(MAX_RECURSION_DEPTH)
    }

    /// Upper bound on the characters a degraded unit contributes, newline included
    #[must_use]
    pub fn max_header_chars(&self) -> usize {
        HEADER_PREFIX_MAX_CHARS + " | ".len() + self.signature_max_chars + 1
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_block_chars == 0 {
            return Err("max_block_chars must be > 0".to_string());
        }
        if self.min_children_for_recursion == 0 {
            return Err("min_children_for_recursion must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = BudgetConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_block_chars, 1000);
        assert!(config.truncation_marker.contains("..."));
    }

    #[test]
    fn test_depth_is_clamped() {
        let config = BudgetConfig {
            max_depth: 40,
            ..BudgetConfig::default()
        };
        assert_eq!(config.effective_depth(), MAX_RECURSION_DEPTH);

        let shallow = BudgetConfig {
            max_depth: 2,
            ..BudgetConfig::default()
        };
        assert_eq!(shallow.effective_depth(), 2);
    }

    #[test]
    fn test_zero_block_rejected() {
        let config = BudgetConfig::with_limits(0, 100);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: BudgetConfig = serde_json::from_str(r#"{"max_total_chars": 900}"#).unwrap();
        assert_eq!(config.max_total_chars, 900);
        assert_eq!(config.signature_max_chars, 100);
    }
}
