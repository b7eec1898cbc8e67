//! Helpers for an LLM trip-planning agent
//!
//! - [`model_loader`]: pick Groq or OpenAI from configuration and build a client
//! - [`calculator`] and [`currency`]: the expense helpers
//! - [`tools`]: those helpers packaged as model-callable tools
//! - [`llm`]: provider clients, tool framework and agent loop

// Lets `#[tool]`-generated code name this crate from inside it
extern crate self as trip_planner;

pub mod calculator;
pub mod config;
pub mod credentials;
pub mod currency;
pub mod llm;
pub mod model_loader;
pub mod tools;

pub use config::{ConfigError, ConfigStore};
pub use credentials::Credentials;
pub use model_loader::{LoadError, ModelLoader};
