//! LLM Abstraction Layer
//!
//! This module provides a unified interface for chat models hosted by Groq
//! and OpenAI, plus the tool and agent machinery built on top of it.

pub mod agent;
pub mod chat;
pub mod core;
pub mod groq;
pub mod openai;
pub mod tools;

// Re-export commonly used types
pub use self::core::{
    config::GenerationConfig,
    error::LlmError,
    provider::{LlmClient, LlmProvider, Provider, UnsupportedProvider},
    types::{
        ContentBlock, FinishReason, GenerateRequest, GenerateResponse, Message, MessageRole,
        ToolDeclaration, UsageMetadata,
    },
};

pub use agent::{Agent, AgentError, AgentEvent, AgentResponse};
pub use groq::GroqClient;
pub use openai::OpenAiClient;
pub use tools::{create_tool_declaration, FunctionRegistry, ToolExecutor};
