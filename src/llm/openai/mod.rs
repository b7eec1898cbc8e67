//! OpenAI provider implementation

pub mod client;

pub use client::OpenAiClient;
