//! Shared chat-completions client

use std::fmt;
use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use tracing::debug;

use crate::llm::core::{
    config::GenerationConfig,
    error::LlmError,
    provider::Provider,
    types::{GenerateRequest, GenerateResponse},
};

use super::mapper::{error_from_status, from_chat_response, to_chat_request};
use super::types::ChatResponse;

/// Client for any endpoint speaking the OpenAI chat-completions protocol
///
/// Both Groq and OpenAI expose this protocol, so the provider clients only
/// differ in their default endpoint.
#[derive(Clone)]
pub struct ChatCompletionsClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Which backend this client targets
    provider: Provider,
    /// Full URL of the chat-completions endpoint
    endpoint: String,
    /// Bearer credential
    api_key: String,
    /// Model identifier sent with every request
    model: String,
    /// Generation parameters resolved from configuration
    generation_config: GenerationConfig,
}

impl ChatCompletionsClient {
    /// Create a new client for the provider's default endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        provider: Provider,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            provider,
            endpoint: provider.default_endpoint().to_string(),
            api_key: api_key.into(),
            model: model.into(),
            generation_config: GenerationConfig::default(),
        })
    }

    /// Point the client at a different chat-completions URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replace the default generation parameters
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = config;
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation_config
    }

    /// Send a completion request and wait for the full response
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let chat_request = to_chat_request(self.provider, &self.model, request);

        debug!(
            provider = %self.provider,
            model = %self.model,
            messages = chat_request.messages.len(),
            "sending chat completion request"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await?;

        // Check status
        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs);
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status.as_u16(), retry_after, body));
        }

        let body = response.text().await?;
        let chat_response: ChatResponse = serde_json::from_str(&body)?;
        from_chat_response(chat_response)
    }
}

impl fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("provider", &self.provider)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("generation_config", &self.generation_config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::core::types::{ContentBlock, FinishReason, Message};
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ChatCompletionsClient {
        ChatCompletionsClient::new(Provider::OpenAi, "gpt-4o-mini", "sk-test")
            .unwrap()
            .with_endpoint(format!("{}/v1/chat/completions", server.uri()))
    }

    #[test]
    fn test_default_endpoint() {
        let client =
            ChatCompletionsClient::new(Provider::Groq, "llama-3.1-8b-instant", "gsk").unwrap();
        assert_eq!(client.endpoint(), "https://api.groq.com/openai/v1/chat/completions");
        assert_eq!(client.model_name(), "llama-3.1-8b-instant");
        assert_eq!(client.provider(), Provider::Groq);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client =
            ChatCompletionsClient::new(Provider::OpenAi, "gpt-4o", "sk-very-secret").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_generate_text_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(bearer_token("sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o-mini",
                "max_completion_tokens": 1024
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Pack light."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .generate(GenerateRequest::from_prompt("Any tips?", GenerationConfig::default()))
            .await
            .unwrap();

        assert_eq!(
            response.content,
            vec![ContentBlock::Text {
                text: "Pack light.".to_string()
            }]
        );
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.unwrap().total_tokens, 12);
    }

    #[tokio::test]
    async fn test_generate_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(GenerateRequest::from_prompt("Hi", GenerationConfig::default()))
            .await
            .unwrap_err();

        match err {
            LlmError::RateLimited { retry_after } => {
                assert_eq!(retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "message": "The model `gpt-9` does not exist",
                    "type": "invalid_request_error",
                    "code": "model_not_found"
                }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(GenerateRequest {
                messages: vec![Message::user("Hi")],
                tools: None,
                config: GenerationConfig::default(),
                system: None,
            })
            .await
            .unwrap_err();

        match err {
            LlmError::Api { code, message } => {
                assert_eq!(code, "model_not_found");
                assert!(message.contains("gpt-9"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .generate(GenerateRequest::from_prompt("Hi", GenerationConfig::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let client = ChatCompletionsClient::new(Provider::Groq, "llama-3.1-8b-instant", "gsk")
            .unwrap()
            .with_endpoint("http://127.0.0.1:1/openai/v1/chat/completions");

        let err = client
            .generate(GenerateRequest::from_prompt("Hi", GenerationConfig::default()))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Transport(_)));
    }
}
