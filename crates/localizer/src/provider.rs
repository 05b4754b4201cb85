use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Coarse class of a failure, used for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Timeout,
    Connectivity,
    Generic,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connectivity => "connectivity",
            Self::Generic => "generic",
        }
    }
}

/// Failure of a single reasoning call, classified at the client
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("Reasoning request timed out: {0}")]
    Timeout(String),

    #[error("Reasoning service unreachable: {0}")]
    Transport(String),

    #[error("Reasoning service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Reply arrived but is unusable (empty, not JSON, no choices)
    #[error("Malformed reasoning reply: {0}")]
    Protocol(String),
}

impl ProviderError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Connectivity,
            // Gateway errors mean the service behind the proxy is down
            Self::Status { status, .. } if matches!(*status, 502 | 503 | 504) => {
                ErrorKind::Connectivity
            }
            Self::Status { .. } | Self::Protocol(_) => ErrorKind::Generic,
        }
    }
}

/// Chat-completion style reasoning service
#[async_trait]
pub trait ReasoningProvider: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(ProviderError::Timeout("t".into()).kind(), ErrorKind::Timeout);
        assert_eq!(ProviderError::Transport("refused".into()).kind(), ErrorKind::Connectivity);
        assert_eq!(
            ProviderError::Status { status: 503, body: String::new() }.kind(),
            ErrorKind::Connectivity
        );
        assert_eq!(
            ProviderError::Status { status: 400, body: String::new() }.kind(),
            ErrorKind::Generic
        );
        assert_eq!(ProviderError::Protocol("empty".into()).kind(), ErrorKind::Generic);
    }

    #[test]
    fn test_message_serializes_for_chat_api() {
        let json = serde_json::to_string(&ChatMessage::system("hi")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"hi"}"#);
    }
}
