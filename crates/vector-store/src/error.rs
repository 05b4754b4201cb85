use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    /// Connection refused, DNS failure and other network-level errors
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Reply arrived but could not be understood
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl VectorStoreError {
    /// Classify a reqwest failure
    pub fn from_http(context: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(format!("{context}: {error}"))
        } else if error.is_decode() {
            Self::Protocol(format!("{context}: {error}"))
        } else {
            Self::Transport(format!("{context}: {error}"))
        }
    }
}
