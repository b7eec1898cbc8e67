//! OpenAI-compatible chat-completions protocol
//!
//! Groq and OpenAI both serve this protocol; the provider clients wrap
//! [`ChatCompletionsClient`] with their own endpoint.

pub mod client;
pub mod mapper;
pub mod types;

pub use client::ChatCompletionsClient;
