use serde::{Deserialize, Serialize};

/// Configuration for definition extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Files larger than this are skipped without parsing
    pub max_file_bytes: usize,

    /// Depth cap for the fallback tree walk
    pub max_traversal_depth: usize,

    /// In-progress match limit handed to the query cursor
    pub query_match_limit: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 512 * 1024,
            max_traversal_depth: 256,
            query_match_limit: 10_000,
        }
    }
}

impl ExtractorConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_file_bytes == 0 {
            return Err("max_file_bytes must be > 0".to_string());
        }
        if self.max_traversal_depth == 0 {
            return Err("max_traversal_depth must be > 0".to_string());
        }
        if self.query_match_limit == 0 {
            return Err("query_match_limit must be > 0".to_string());
        }
        Ok(())
    }
}
