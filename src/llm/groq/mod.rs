//! Groq provider implementation
//!
//! Groq serves its models through an OpenAI-compatible endpoint, so this
//! client is a thin wrapper over the shared chat-completions client.

pub mod client;

pub use client::GroqClient;
