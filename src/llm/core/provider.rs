//! Provider selection and the trait all LLM clients satisfy

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    config::GenerationConfig,
    error::LlmError,
    types::{GenerateRequest, GenerateResponse},
};
use crate::llm::groq::GroqClient;
use crate::llm::openai::OpenAiClient;

/// Which hosted LLM backend to target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Groq (OpenAI-compatible endpoint)
    Groq,
    /// OpenAI
    #[default]
    OpenAi,
}

impl Provider {
    /// Every supported provider
    pub const ALL: [Provider; 2] = [Provider::Groq, Provider::OpenAi];

    /// Name used in configuration paths and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Groq => "groq",
            Provider::OpenAi => "openai",
        }
    }

    /// Environment variable holding this provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Chat-completions endpoint used when the configuration does not override it
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Provider::Groq => "https://api.groq.com/openai/v1/chat/completions",
            Provider::OpenAi => "https://api.openai.com/v1/chat/completions",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider name outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported provider: {0} (expected one of: groq, openai)")]
pub struct UnsupportedProvider(pub String);

impl FromStr for Provider {
    type Err = UnsupportedProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "groq" => Ok(Provider::Groq),
            "openai" => Ok(Provider::OpenAi),
            other => Err(UnsupportedProvider(other.to_string())),
        }
    }
}

/// Main interface that all LLM provider implementations must satisfy
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a request to the model and wait for the complete response
    ///
    /// # Arguments
    /// * `request` - The generation request with messages, tools, and config
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// The backend this client talks to
    fn provider(&self) -> Provider;

    /// The model identifier sent with each request
    fn model_name(&self) -> &str;
}

/// Provider-tagged client handle produced by the model loader
///
/// Construction performs no network I/O; the first request is made by
/// [`LlmProvider::generate`].
#[derive(Debug, Clone)]
pub enum LlmClient {
    /// Client for Groq
    Groq(GroqClient),
    /// Client for OpenAI
    OpenAi(OpenAiClient),
}

impl LlmClient {
    /// Generation parameters resolved from configuration
    pub fn generation_config(&self) -> &GenerationConfig {
        match self {
            LlmClient::Groq(client) => client.generation_config(),
            LlmClient::OpenAi(client) => client.generation_config(),
        }
    }
}

#[async_trait]
impl LlmProvider for LlmClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        match self {
            LlmClient::Groq(client) => client.generate(request).await,
            LlmClient::OpenAi(client) => client.generate(request).await,
        }
    }

    fn provider(&self) -> Provider {
        match self {
            LlmClient::Groq(_) => Provider::Groq,
            LlmClient::OpenAi(_) => Provider::OpenAi,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            LlmClient::Groq(client) => client.model_name(),
            LlmClient::OpenAi(client) => client.model_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_provider_is_openai() {
        assert_eq!(Provider::default(), Provider::OpenAi);
        assert_eq!(Provider::default().as_str(), "openai");
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("groq".parse::<Provider>().unwrap(), Provider::Groq);
        assert_eq!("openai".parse::<Provider>().unwrap(), Provider::OpenAi);

        let err = "anthropic".parse::<Provider>().unwrap_err();
        assert_eq!(err, UnsupportedProvider("anthropic".to_string()));
        assert!(err.to_string().contains("anthropic"));
    }

    #[test]
    fn test_provider_names_are_case_sensitive() {
        assert!("OpenAI".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_env_vars() {
        assert_eq!(Provider::Groq.api_key_env(), "GROQ_API_KEY");
        assert_eq!(Provider::OpenAi.api_key_env(), "OPENAI_API_KEY");
    }

    #[test]
    fn test_provider_serde_names() {
        assert_eq!(serde_json::to_string(&Provider::OpenAi).unwrap(), "\"openai\"");
        let parsed: Provider = serde_json::from_str("\"groq\"").unwrap();
        assert_eq!(parsed, Provider::Groq);
    }
}
