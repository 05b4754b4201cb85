use thiserror::Error;

/// Result type for extractor operations
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Errors raised while preparing parsers and queries.
///
/// Per-file problems (unsupported extension, unparsable source) are reported
/// through [`crate::FileOutcome`] instead.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Pattern query failed to compile or run
    #[error("Query error: {0}")]
    QueryError(String),

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl ExtractorError {
    /// Create a query error
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}
