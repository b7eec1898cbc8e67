//! Currency conversion tool

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::currency::{CurrencyConverter, CurrencyError, EXCHANGE_RATE_API_KEY_ENV};
use crate::llm::tools::{create_tool_declaration, FunctionRegistry, RegistryError};

/// Name the tool is declared under
pub const CONVERT_CURRENCY: &str = "convert_currency";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConvertCurrencyArgs {
    /// Amount of money to convert
    pub amount: f64,
    /// ISO 4217 code of the source currency, e.g. "USD"
    pub from_currency: String,
    /// ISO 4217 code of the target currency, e.g. "EUR"
    pub to_currency: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub amount: f64,
    pub from_currency: String,
    pub to_currency: String,
    pub converted_amount: f64,
}

/// Exposes [`CurrencyConverter::convert`] to the model
#[derive(Debug, Clone)]
pub struct CurrencyConverterTool {
    converter: Arc<CurrencyConverter>,
}

impl CurrencyConverterTool {
    /// Build the tool from an API key
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, CurrencyError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CurrencyError::MissingApiKey(EXCHANGE_RATE_API_KEY_ENV));
        }
        Ok(Self::with_converter(CurrencyConverter::new(api_key)?))
    }

    /// Build the tool from `EXCHANGE_RATE_API_KEY`
    pub fn from_env() -> Result<Self, CurrencyError> {
        let api_key = std::env::var(EXCHANGE_RATE_API_KEY_ENV)
            .map_err(|_| CurrencyError::MissingApiKey(EXCHANGE_RATE_API_KEY_ENV))?;
        Self::new(api_key)
    }

    /// Wrap an already configured converter
    pub fn with_converter(converter: CurrencyConverter) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }

    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    /// Add `convert_currency` to the registry
    pub fn register(&self, registry: &mut FunctionRegistry) -> Result<(), RegistryError> {
        let converter = Arc::clone(&self.converter);
        let declaration = create_tool_declaration::<ConvertCurrencyArgs>(
            CONVERT_CURRENCY,
            "Convert amount from one currency to another",
        );

        registry.register_async_tool(declaration, move |args: ConvertCurrencyArgs| {
            let converter = Arc::clone(&converter);
            async move {
                let converted_amount = converter
                    .convert(args.amount, &args.from_currency, &args.to_currency)
                    .await
                    .map_err(|e| e.to_string())?;

                Ok::<_, String>(ConversionResult {
                    amount: args.amount,
                    from_currency: args.from_currency.trim().to_ascii_uppercase(),
                    to_currency: args.to_currency.trim().to_ascii_uppercase(),
                    converted_amount,
                })
            }
        })?;

        info!(tool = CONVERT_CURRENCY, "currency tool registered");
        Ok(())
    }
}
