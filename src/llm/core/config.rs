//! Per-provider sampling settings
//!
//! Filled from the optional `llm.<provider>.temperature` and
//! `llm.<provider>.max_tokens` keys; anything left unset falls back to the
//! provider's own default, except the token cap which is always sent.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Token cap used when the configuration does not set one
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Temperatures both providers accept
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Sampling temperature; `None` leaves the provider default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationConfig {
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_leaves_temperature_to_provider() {
        let config = GenerationConfig::default();
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.temperature, None);
    }

    #[test]
    fn test_builders() {
        let config = GenerationConfig::default()
            .with_max_tokens(300)
            .with_temperature(0.4);
        assert_eq!(
            config,
            GenerationConfig {
                max_tokens: 300,
                temperature: Some(0.4),
            }
        );
    }

    #[test]
    fn test_temperature_range() {
        assert!(TEMPERATURE_RANGE.contains(&0.0));
        assert!(TEMPERATURE_RANGE.contains(&2.0));
        assert!(!TEMPERATURE_RANGE.contains(&2.5));
    }
}
