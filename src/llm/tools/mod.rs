//! Tool execution framework
//!
//! This module provides the infrastructure for executing tool calls from LLMs.
//! It includes the `ToolExecutor` trait and the `FunctionRegistry` for managing
//! and executing registered tool functions.

pub mod declaration;
pub mod executor;
pub mod registry;

pub use declaration::create_tool_declaration;
pub use executor::ToolExecutor;
pub use registry::{AsyncToolFn, FunctionRegistry, RegistryError, ToolRegistration};

/// Helper macro to register multiple `#[tool]` functions at once
///
/// Takes a registry and the generated `<fn>_tool` module paths; evaluates to
/// `Result<(), RegistryError>`.
///
/// # Example
///
/// ```ignore
/// #[tool(description = "Multiply two integers")]
/// fn multiply(args: MultiplyArgs) -> Result<MultiplyResult, String> {
///     // Implementation
/// }
///
/// let mut registry = FunctionRegistry::new();
/// register_tools!(registry, multiply_tool, calculate_total_tool)?;
/// ```
#[macro_export]
macro_rules! register_tools {
    ($registry:expr, $($tool_mod:path),+ $(,)?) => {
        (|| -> ::std::result::Result<(), $crate::llm::tools::RegistryError> {
            $(
                {
                    use $tool_mod as tool;
                    $registry.register(tool::registration())?;
                }
            )+
            Ok(())
        })()
    };
}
