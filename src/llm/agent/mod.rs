//! Simple agent loop implementation
//!
//! This module provides a simple agent that:
//! - Maintains conversation history
//! - Calls the LLM and waits for the complete response
//! - Automatically executes tool calls
//! - Loops until getting a text-only response

mod error;

pub use error::AgentError;

use tracing::{debug, info};

use crate::llm::core::{
    config::GenerationConfig,
    provider::LlmProvider,
    types::{
        ContentBlock, GenerateRequest, GenerateResponse, Message, MessageRole, ToolDeclaration,
        UsageMetadata,
    },
};
use crate::llm::tools::executor::ToolExecutor;

/// Events recorded by the agent during execution
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// Agent is starting a new iteration (calling LLM again after tool execution)
    IterationStarted { iteration: usize },

    /// Complete response from the model
    LlmResponse(GenerateResponse),

    /// Agent is executing a tool call
    ToolExecutionStarted {
        tool_use_id: String,
        name: String,
        input: serde_json::Value,
    },

    /// Tool execution completed successfully
    ToolExecutionCompleted {
        tool_use_id: String,
        name: String,
        result: String,
    },

    /// Tool execution failed with an error
    ToolExecutionFailed {
        tool_use_id: String,
        name: String,
        error: String,
    },

    /// Agent loop completed (final response with no tool calls)
    Completed,
}

/// Outcome of one [`Agent::run`] call
#[derive(Debug, Clone)]
pub struct AgentResponse {
    /// Text of the final assistant message
    pub text: String,
    /// Everything that happened, in order
    pub events: Vec<AgentEvent>,
    /// Token usage summed over every model call
    pub usage: UsageMetadata,
    /// Number of model calls made
    pub iterations: usize,
}

/// Simple agent that manages conversation history and tool execution
pub struct Agent {
    /// LLM provider (Groq or OpenAI)
    provider: Box<dyn LlmProvider>,

    /// Tool executor for handling function calls
    tool_executor: Box<dyn ToolExecutor>,

    /// Tool declarations available to the LLM
    tool_declarations: Vec<ToolDeclaration>,

    /// Conversation history (kept in memory)
    messages: Vec<Message>,

    /// Sampling settings sent with every request
    config: GenerationConfig,

    /// System prompt (optional)
    system: Option<String>,

    /// Maximum number of agent loop iterations (default: 10)
    max_iterations: usize,
}

impl Agent {
    /// Create a new agent with default settings
    pub fn new(
        provider: Box<dyn LlmProvider>,
        tool_executor: Box<dyn ToolExecutor>,
        tool_declarations: Vec<ToolDeclaration>,
        config: GenerationConfig,
        system: Option<String>,
    ) -> Self {
        Self {
            provider,
            tool_executor,
            tool_declarations,
            messages: Vec::new(),
            config,
            system,
            max_iterations: 10,
        }
    }

    /// Set the maximum number of iterations (default: 10)
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max;
        self
    }

    /// Process a new user message through the agent loop
    ///
    /// Adds the message to the history, then calls the model until it answers
    /// without requesting tools. Tool failures are reported back to the model
    /// as error results rather than aborting the run.
    pub async fn run(
        &mut self,
        user_message: impl Into<String>,
    ) -> Result<AgentResponse, AgentError> {
        self.messages.push(Message::user(user_message));

        let mut events = Vec::new();
        let mut usage = UsageMetadata::default();
        let mut iteration = 0;

        loop {
            iteration += 1;

            if iteration > self.max_iterations {
                return Err(AgentError::IterationLimit(self.max_iterations));
            }

            events.push(AgentEvent::IterationStarted { iteration });

            let request = GenerateRequest {
                messages: self.messages.clone(),
                tools: (!self.tool_declarations.is_empty())
                    .then(|| self.tool_declarations.clone()),
                config: self.config.clone(),
                system: self.system.clone(),
            };

            debug!(
                provider = %self.provider.provider(),
                model = self.provider.model_name(),
                iteration,
                "calling model"
            );
            let response = self.provider.generate(request).await?;
            if let Some(call_usage) = &response.usage {
                usage.add(call_usage);
            }

            let tool_uses: Vec<(String, String, serde_json::Value)> = response
                .content
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::ToolUse { id, name, input } => {
                        Some((id.clone(), name.clone(), input.clone()))
                    }
                    _ => None,
                })
                .collect();

            self.messages.push(Message {
                role: MessageRole::Assistant,
                content: response.content.clone(),
            });
            let text = response.text();
            events.push(AgentEvent::LlmResponse(response));

            if tool_uses.is_empty() {
                events.push(AgentEvent::Completed);
                info!(
                    iterations = iteration,
                    total_tokens = usage.total_tokens,
                    "agent run completed"
                );
                return Ok(AgentResponse {
                    text,
                    events,
                    usage,
                    iterations: iteration,
                });
            }

            for (id, name, input) in tool_uses {
                events.push(AgentEvent::ToolExecutionStarted {
                    tool_use_id: id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                });

                match self
                    .tool_executor
                    .execute(id.clone(), name.clone(), input)
                    .await
                {
                    Ok(result) => {
                        events.push(AgentEvent::ToolExecutionCompleted {
                            tool_use_id: id.clone(),
                            name,
                            result: result.clone(),
                        });
                        self.messages.push(Message::tool_result(id, result));
                    }
                    Err(error) => {
                        events.push(AgentEvent::ToolExecutionFailed {
                            tool_use_id: id.clone(),
                            name,
                            error: error.clone(),
                        });
                        self.messages.push(Message::tool_error(id, error));
                    }
                }
            }
        }
    }

    /// Get the full conversation history
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Clear conversation history (start fresh)
    pub fn clear_history(&mut self) {
        self.messages.clear();
    }
}
