//! Provider API keys
//!
//! The loader never reads the environment itself; the application collects
//! keys here (usually with [`Credentials::from_env`]) and passes them in.

use std::collections::HashMap;
use std::fmt;

use crate::llm::Provider;

/// API keys for the supported LLM providers
#[derive(Clone, Default)]
pub struct Credentials {
    keys: HashMap<Provider, String>,
}

impl Credentials {
    /// No keys at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `GROQ_API_KEY` and `OPENAI_API_KEY` from the process environment
    pub fn from_env() -> Self {
        Provider::ALL
            .into_iter()
            .fold(Self::new(), |credentials, provider| {
                match std::env::var(provider.api_key_env()) {
                    Ok(key) => credentials.with_api_key(provider, key),
                    Err(_) => credentials,
                }
            })
    }

    /// Set the key for one provider
    pub fn with_api_key(mut self, provider: Provider, api_key: impl Into<String>) -> Self {
        self.keys.insert(provider, api_key.into());
        self
    }

    /// The provider's key, if present and non-empty
    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        self.keys
            .get(&provider)
            .map(String::as_str)
            .filter(|key| !key.trim().is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut providers: Vec<&str> = self.keys.keys().map(Provider::as_str).collect();
        providers.sort_unstable();
        f.debug_struct("Credentials")
            .field("providers", &providers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sets or clears environment variables, restoring the old values on drop
    struct EnvGuard {
        saved: Vec<(&'static str, Option<String>)>,
    }

    impl EnvGuard {
        fn set(vars: &[(&'static str, Option<&str>)]) -> Self {
            let saved = vars
                .iter()
                .map(|(name, value)| {
                    let previous = std::env::var(name).ok();
                    match value {
                        Some(value) => std::env::set_var(name, value),
                        None => std::env::remove_var(name),
                    }
                    (*name, previous)
                })
                .collect();
            Self { saved }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (name, previous) in &self.saved {
                match previous {
                    Some(value) => std::env::set_var(name, value),
                    None => std::env::remove_var(name),
                }
            }
        }
    }

    // The only test in this crate that touches these variables
    #[test]
    fn test_from_env() {
        let _guard = EnvGuard::set(&[
            ("GROQ_API_KEY", Some("gsk_from_env")),
            ("OPENAI_API_KEY", None),
        ]);

        let credentials = Credentials::from_env();
        assert_eq!(credentials.api_key(Provider::Groq), Some("gsk_from_env"));
        assert_eq!(credentials.api_key(Provider::OpenAi), None);
    }

    #[test]
    fn test_api_key_lookup() {
        let credentials = Credentials::new().with_api_key(Provider::Groq, "gsk_abc");
        assert_eq!(credentials.api_key(Provider::Groq), Some("gsk_abc"));
        assert_eq!(credentials.api_key(Provider::OpenAi), None);
    }

    #[test]
    fn test_empty_key_counts_as_missing() {
        let credentials = Credentials::new()
            .with_api_key(Provider::OpenAi, "")
            .with_api_key(Provider::Groq, "   ");
        assert_eq!(credentials.api_key(Provider::OpenAi), None);
        assert_eq!(credentials.api_key(Provider::Groq), None);
    }

    #[test]
    fn test_debug_hides_keys() {
        let credentials = Credentials::new().with_api_key(Provider::OpenAi, "sk-secret");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("openai"));
        assert!(!debug.contains("sk-secret"));
    }
}
