use crate::llm::core::error::LlmError;

/// Why [`Agent::run`](super::Agent::run) stopped without a final answer
///
/// Tool failures are not here: they go back to the model as error results.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Model call failed: {0}")]
    Llm(#[from] LlmError),

    /// The model kept requesting tools past the configured number of calls
    #[error("No final answer after {0} model calls")]
    IterationLimit(usize),
}
