use crate::provider::{ChatMessage, ProviderError, ReasoningProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for an OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: Option<u32>,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 300,
            max_tokens: None,
        }
    }
}

/// Client for `POST {api_url}/v1/chat/completions`
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Longest body excerpt carried in errors and logs
const BODY_EXCERPT_CHARS: usize = 500;

impl OpenAiCompatClient {
    pub fn new(config: &ReasoningConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: chat_endpoint(&config.api_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn chat_endpoint(api_url: &str) -> String {
    let base = api_url.trim_end_matches('/');
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{base}/v1/chat/completions")
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_CHARS).collect()
}

fn classify(error: &reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(error.to_string())
    } else {
        ProviderError::Transport(error.to_string())
    }
}

/// Content of the first choice in a raw chat completion body
fn parse_reply(body: &str) -> Result<String, ProviderError> {
    if body.trim().is_empty() {
        return Err(ProviderError::Protocol("empty response body".to_string()));
    }
    let reply: ChatResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::Protocol(format!("response is not valid JSON ({e}): {}", excerpt(body)))
    })?;
    let choice = reply
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Protocol("response has no choices".to_string()))?;
    Ok(choice.message.content.unwrap_or_default())
}

#[async_trait]
impl ReasoningProvider for OpenAiCompatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens: self.max_tokens,
        };

        let mut builder = self.http.post(&self.endpoint).json(&request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }
        let response = builder.send().await.map_err(|e| classify(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| classify(&e))?;
        if !status.is_success() {
            log::error!("Reasoning API error: {status} - {}", excerpt(&body));
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        parse_reply(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_endpoint() {
        assert_eq!(
            chat_endpoint("https://llm.example.com/"),
            "https://llm.example.com/v1/chat/completions"
        );
        assert_eq!(
            chat_endpoint("https://llm.example.com/v1"),
            "https://llm.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_reply() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"ok"}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "ok");
    }

    #[test]
    fn test_parse_reply_protocol_errors() {
        for body in ["", "<html>bad gateway</html>", r#"{"choices":[]}"#, r#"{"id":"x"}"#] {
            let err = parse_reply(body).unwrap_err();
            assert!(matches!(err, ProviderError::Protocol(_)), "{body}: {err}");
        }
    }

    #[test]
    fn test_request_omits_unset_fields() {
        let messages = vec![ChatMessage::user("hi")];
        let request = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: None,
            max_tokens: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"model": "m", "messages": [{"role": "user", "content": "hi"}]})
        );
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connectivity() {
        let client = OpenAiCompatClient::new(&ReasoningConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
            ..ReasoningConfig::default()
        })
        .unwrap();

        let err = client.complete(&[ChatMessage::user("hi")], None).await.unwrap_err();
        assert_ne!(err.kind(), crate::provider::ErrorKind::Generic, "{err}");
    }
}
