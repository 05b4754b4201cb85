use crate::provider::{ErrorKind, ProviderError};
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocalizeError>;

/// Whole-run failures of a localization
#[derive(Error, Debug)]
pub enum LocalizeError {
    /// No features could be derived from the problem statement
    #[error("Feature extraction failed ({}): {source}", kind.as_str())]
    FeatureExtraction {
        kind: ErrorKind,
        #[source]
        source: ProviderError,
    },

    #[error("Analysis timed out after {0:?}")]
    Timeout(Duration),

    /// Background task died before producing the code structure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LocalizeError {
    pub fn feature_extraction(source: ProviderError) -> Self {
        Self::FeatureExtraction {
            kind: source.kind(),
            source,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::FeatureExtraction { kind, .. } => *kind,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Internal(_) => ErrorKind::Generic,
        }
    }

    /// Short message suitable for end users
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Timeout => "The analysis timed out. Please try again later.",
            ErrorKind::Connectivity => {
                "Could not reach the reasoning service. Check the service URL and network."
            }
            ErrorKind::Generic => "The analysis failed. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classified_messages() {
        let err = LocalizeError::feature_extraction(ProviderError::Transport("refused".into()));
        assert_eq!(err.kind(), ErrorKind::Connectivity);
        assert!(err.user_message().contains("reach"));
        assert!(err.to_string().contains("connectivity"));

        let err = LocalizeError::Timeout(Duration::from_secs(3));
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert!(err.user_message().contains("timed out"));

        let err = LocalizeError::feature_extraction(ProviderError::Protocol("empty".into()));
        assert_eq!(err.kind(), ErrorKind::Generic);
    }
}
