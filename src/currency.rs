//! Currency conversion over the ExchangeRate-API v6 HTTP interface

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Environment variable holding the exchange-rate API key
pub const EXCHANGE_RATE_API_KEY_ENV: &str = "EXCHANGE_RATE_API_KEY";

/// Base URL of the hosted API
pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Errors that can occur while converting currencies
#[derive(Debug, Error)]
pub enum CurrencyError {
    /// No API key was supplied
    #[error("API key not found for {0}")]
    MissingApiKey(&'static str),

    /// The request got no response, or the body could not be read
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success status without an API error payload
    #[error("HTTP error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// The API answered with `"result": "error"`
    #[error("Exchange rate API error: {0}")]
    Api(String),

    /// Currency code unknown to the API
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Response body did not match the expected shape
    #[error("Failed to decode exchange rate response: {0}")]
    Decode(#[from] serde_json::Error),
}

// The API key is a path segment, so the URL must never reach the message
impl From<reqwest::Error> for CurrencyError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status();
        let message = err.without_url().to_string();
        match status {
            Some(status) => CurrencyError::Http {
                status: status.as_u16(),
                body: message,
            },
            None => CurrencyError::Transport(message),
        }
    }
}

/// Body of `GET /{key}/latest/{base}`
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: String,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

/// Client for the exchange-rate API
#[derive(Clone)]
pub struct CurrencyConverter {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl CurrencyConverter {
    /// Create a converter for the hosted API
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, CurrencyError> {
        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| CurrencyError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the converter at a different API root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every rate relative to `base_currency`
    pub async fn latest_rates(
        &self,
        base_currency: &str,
    ) -> Result<HashMap<String, f64>, CurrencyError> {
        let base_currency = normalize_code(base_currency)?;
        let url = format!("{}/{}/latest/{}", self.base_url, self.api_key, base_currency);

        debug!(base = %base_currency, "fetching exchange rates");
        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error payloads come with 4xx statuses, so try to decode before checking
        match serde_json::from_str::<LatestRatesResponse>(&body) {
            Ok(rates) if rates.result == "success" => Ok(rates.conversion_rates),
            Ok(rates) => {
                let error_type = rates.error_type.unwrap_or_else(|| "unknown-error".to_string());
                if error_type == "unsupported-code" {
                    Err(CurrencyError::UnsupportedCurrency(base_currency))
                } else {
                    Err(CurrencyError::Api(error_type))
                }
            }
            Err(_) if !status.is_success() => Err(CurrencyError::Http {
                status: status.as_u16(),
                body,
            }),
            Err(err) => Err(err.into()),
        }
    }

    /// Convert `amount` from one currency to another
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedCurrency` when either code is unknown.
    pub async fn convert(
        &self,
        amount: f64,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<f64, CurrencyError> {
        let to_currency = normalize_code(to_currency)?;
        let rates = self.latest_rates(from_currency).await?;
        let rate = rates
            .get(&to_currency)
            .copied()
            .ok_or(CurrencyError::UnsupportedCurrency(to_currency))?;
        Ok(amount * rate)
    }
}

impl fmt::Debug for CurrencyConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrencyConverter")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Trim and upper-case an ISO 4217 code
fn normalize_code(code: &str) -> Result<String, CurrencyError> {
    let code = code.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CurrencyError::UnsupportedCurrency(code.to_string()));
    }
    Ok(code.to_ascii_uppercase())
}
