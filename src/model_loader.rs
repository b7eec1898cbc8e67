//! Config-driven LLM client construction
//!
//! [`ModelLoader`] combines a provider selection, the configuration document
//! and injected credentials into a ready-to-use [`LlmClient`]. For a provider
//! `p` it reads:
//!
//! - `llm.<p>.model_name` (required)
//! - `llm.<p>.base_url` (optional, e.g. `https://api.groq.com/openai/v1`)
//! - `llm.<p>.temperature` and `llm.<p>.max_tokens` (optional)

use thiserror::Error;
use tracing::info;

use crate::config::{optional, ConfigError, ConfigStore};
use crate::credentials::Credentials;
use crate::llm::core::config::TEMPERATURE_RANGE;
use crate::llm::{
    GenerationConfig, GroqClient, LlmClient, LlmError, LlmProvider, OpenAiClient, Provider,
    UnsupportedProvider,
};

/// Errors raised by [`ModelLoader::load_llm`]
#[derive(Debug, Error)]
pub enum LoadError {
    /// The provider's API key is unset or empty
    #[error("Missing credential for {provider}: set {env_var}")]
    MissingCredential {
        provider: Provider,
        env_var: &'static str,
    },

    /// A required configuration path is absent
    #[error("Config key missing: {path}")]
    ConfigKeyMissing { path: String },

    /// A configuration value is present but unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(ConfigError),

    /// The provider name is not one of the supported backends
    #[error(transparent)]
    UnsupportedProvider(#[from] UnsupportedProvider),

    /// The client itself could not be built
    #[error("Failed to construct client: {0}")]
    Client(#[from] LlmError),
}

impl From<ConfigError> for LoadError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::KeyNotFound { path } => LoadError::ConfigKeyMissing { path },
            other => LoadError::InvalidConfig(other),
        }
    }
}

/// Everything resolved for one provider before a client is built
struct ProviderSettings {
    model_name: String,
    api_key: String,
    endpoint: Option<String>,
    generation_config: GenerationConfig,
}

/// Builds LLM clients from configuration
#[derive(Debug)]
pub struct ModelLoader {
    provider: Provider,
    config: ConfigStore,
    credentials: Credentials,
}

impl ModelLoader {
    /// Create a loader for an explicit provider
    pub fn new(provider: Provider, config: ConfigStore, credentials: Credentials) -> Self {
        Self {
            provider,
            config,
            credentials,
        }
    }

    /// Create a loader for the default provider (OpenAI)
    pub fn with_default_provider(config: ConfigStore, credentials: Credentials) -> Self {
        Self::new(Provider::default(), config, credentials)
    }

    /// Create a loader from a provider name such as `"groq"`
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedProvider` for any name other than `groq` or `openai`.
    pub fn from_provider_name(
        name: &str,
        config: ConfigStore,
        credentials: Credentials,
    ) -> Result<Self, LoadError> {
        let provider = name.parse::<Provider>()?;
        Ok(Self::new(provider, config, credentials))
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Construct a new client for the selected provider
    ///
    /// A fresh client is built on every call and no request is sent.
    ///
    /// # Errors
    ///
    /// - `MissingCredential` if the provider's key is unset or empty
    /// - `ConfigKeyMissing` if `llm.<provider>.model_name` is absent
    /// - `InvalidConfig` if a present value has the wrong type
    pub fn load_llm(&self) -> Result<LlmClient, LoadError> {
        info!(provider = %self.provider, "loading LLM");

        let client = match self.provider {
            Provider::Groq => {
                let settings = self.resolve(Provider::Groq)?;
                let mut client = GroqClient::new(settings.model_name, settings.api_key)?
                    .with_generation_config(settings.generation_config);
                if let Some(endpoint) = settings.endpoint {
                    client = client.with_endpoint(endpoint);
                }
                LlmClient::Groq(client)
            }
            Provider::OpenAi => {
                let settings = self.resolve(Provider::OpenAi)?;
                let mut client = OpenAiClient::new(settings.model_name, settings.api_key)?
                    .with_generation_config(settings.generation_config);
                if let Some(endpoint) = settings.endpoint {
                    client = client.with_endpoint(endpoint);
                }
                LlmClient::OpenAi(client)
            }
        };

        info!(
            provider = %self.provider,
            model = client.model_name(),
            "LLM loaded"
        );
        Ok(client)
    }

    fn resolve(&self, provider: Provider) -> Result<ProviderSettings, LoadError> {
        let api_key = self
            .credentials
            .api_key(provider)
            .ok_or(LoadError::MissingCredential {
                provider,
                env_var: provider.api_key_env(),
            })?
            .to_string();

        let prefix = format!("llm.{}", provider.as_str());
        let model_name = self
            .config
            .get_str(&format!("{prefix}.model_name"))?
            .to_string();

        let endpoint = optional(self.config.get_str(&format!("{prefix}.base_url")))?
            .map(|base| format!("{}/chat/completions", base.trim_end_matches('/')));

        let mut generation_config = GenerationConfig::default();
        let temperature_path = format!("{prefix}.temperature");
        if let Some(temperature) = optional(self.config.get_f64(&temperature_path))? {
            let temperature = temperature as f32;
            if !TEMPERATURE_RANGE.contains(&temperature) {
                return Err(invalid(temperature_path, "number between 0 and 2"));
            }
            generation_config = generation_config.with_temperature(temperature);
        }
        let max_tokens_path = format!("{prefix}.max_tokens");
        if let Some(max_tokens) = optional(self.config.get_u64(&max_tokens_path))? {
            let max_tokens = u32::try_from(max_tokens)
                .map_err(|_| invalid(max_tokens_path, "32-bit unsigned integer"))?;
            generation_config = generation_config.with_max_tokens(max_tokens);
        }

        Ok(ProviderSettings {
            model_name,
            api_key,
            endpoint,
            generation_config,
        })
    }
}

fn invalid(path: String, expected: &'static str) -> LoadError {
    LoadError::InvalidConfig(ConfigError::InvalidType { path, expected })
}
