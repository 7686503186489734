//! Minimal OpenAI REST client
//!
//! Chat completions only, with no domain-specific logic. Each call is a single
//! request; callers own pacing and any retry policy.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{ChatRequest, Message, OpenAIClient};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let response = client
//!     .chat_completion(
//!         ChatRequest::new("gpt-3.5-turbo")
//!             .message(Message::system("You are a geographic expert."))
//!             .message(Message::user("List five towns near Denver, CO"))
//!             .temperature(0.5),
//!     )
//!     .await?;
//! println!("{}", response.content);
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for Azure, proxies, local fakes).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Returns the trimmed content of the first choice.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %message, "OpenAI API error");
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(OpenAIError::EmptyResponse)?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "OpenAI chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = OpenAIClient::new("sk-test").with_base_url("https://custom.api.com/");

        assert_eq!(client.api_key, "sk-test");
        assert_eq!(client.base_url(), "https://custom.api.com");
    }

    #[test]
    fn rate_limit_is_detected_from_status() {
        let err = OpenAIError::Api {
            status: 429,
            message: "slow down".into(),
        };
        assert!(err.is_rate_limited());
        assert!(!OpenAIError::EmptyResponse.is_rate_limited());
    }

    fn client_for(server: &wiremock::MockServer) -> OpenAIClient {
        OpenAIClient::new("sk-test").with_base_url(server.uri())
    }

    fn request() -> ChatRequest {
        ChatRequest::new("gpt-3.5-turbo")
            .message(Message::user("List towns near Denver, CO"))
            .max_tokens(150)
    }

    #[tokio::test]
    async fn completion_returns_trimmed_first_choice() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("POST"))
            .and(wiremock::matchers::path("/chat/completions"))
            .and(wiremock::matchers::header("authorization", "Bearer sk-test"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "  Golden, CO \n"}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server).chat_completion(request()).await.unwrap();

        assert_eq!(response.content, "Golden, CO");
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(16));
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_error() {
        for status in [400u16, 404, 429, 500] {
            let server = wiremock::MockServer::start().await;
            wiremock::Mock::given(wiremock::matchers::path("/chat/completions"))
                .respond_with(wiremock::ResponseTemplate::new(status).set_body_string("nope"))
                .mount(&server)
                .await;

            let err = client_for(&server)
                .chat_completion(request())
                .await
                .unwrap_err();

            assert_eq!(err.status(), Some(status), "{err}");
            assert!(matches!(err, OpenAIError::Api { ref message, .. } if message == "nope"));
        }
    }

    #[tokio::test]
    async fn undecodable_or_empty_bodies_are_errors() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::path("/chat/completions"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;
        let err = client_for(&server).chat_completion(request()).await.unwrap_err();
        assert!(matches!(err, OpenAIError::Parse(_)));

        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::path("/chat/completions"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;
        let err = client_for(&server).chat_completion(request()).await.unwrap_err();
        assert!(matches!(err, OpenAIError::EmptyResponse));
    }
}
