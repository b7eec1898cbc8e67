//! Tool executor trait

use async_trait::async_trait;

/// Trait for executing tool calls from the LLM
///
/// The agent hands every tool call the model makes to an executor. Results
/// and errors are both plain strings because they go straight back into the
/// conversation as tool messages.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool call
    ///
    /// # Arguments
    ///
    /// * `tool_use_id` - Identifier the provider assigned to this call
    /// * `name` - Name of the tool to execute
    /// * `arguments` - Tool arguments as a JSON value
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Successful execution result (JSON string)
    /// * `Err(String)` - Error message describing what went wrong
    async fn execute(
        &self,
        tool_use_id: String,
        name: String,
        arguments: serde_json::Value,
    ) -> Result<String, String>;
}
