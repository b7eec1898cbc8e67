//! OpenAI client implementation

use async_trait::async_trait;

use crate::llm::chat::ChatCompletionsClient;
use crate::llm::core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{LlmProvider, Provider},
    types::{GenerateRequest, GenerateResponse},
};

/// Client for OpenAI chat models
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    inner: ChatCompletionsClient,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    ///
    /// # Arguments
    ///
    /// * `model` - OpenAI model identifier (e.g. "gpt-4o-mini")
    /// * `api_key` - value of `OPENAI_API_KEY`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built. No request is sent.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Result<Self, LlmError> {
        Ok(Self {
            inner: ChatCompletionsClient::new(Provider::OpenAi, model, api_key)?,
        })
    }

    /// Use a different chat-completions URL (Azure, proxies, local gateways)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.inner = self.inner.with_endpoint(endpoint);
        self
    }

    /// Set the default generation parameters
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.inner = self.inner.with_generation_config(config);
        self
    }

    pub fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        self.inner.generation_config()
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.inner.generate(request).await
    }

    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }
}
