//! Function registry for tool execution

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::executor::ToolExecutor;
use crate::llm::core::types::ToolDeclaration;

/// Type alias for boxed async functions
pub type AsyncToolFn =
    Box<dyn Fn(serde_json::Value) -> BoxFuture<'static, Result<String, String>> + Send + Sync>;

/// Errors raised while registering tools
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A tool with this name is already registered
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}

/// Everything needed to register a tool in one step
///
/// Produced by the `registration()` function that `#[tool]` generates.
pub struct ToolRegistration {
    /// Tool name, as declared to the model
    pub name: &'static str,
    /// Type-erased executable
    pub function: AsyncToolFn,
    /// Declaration sent to the model
    pub declaration: ToolDeclaration,
}

/// Registry for managing tool functions
///
/// Holds the Rust functions the model may call, keyed by tool name.
/// Arguments arrive as JSON and are deserialized into the function's
/// argument type; results are serialized back to a JSON string.
///
/// # Example
///
/// ```ignore
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize)]
/// struct BudgetArgs {
///     total: f64,
///     days: i64,
/// }
///
/// let mut registry = FunctionRegistry::new();
/// registry.register_sync("daily_budget", |args: BudgetArgs| {
///     Ok(calculate_daily_budget(args.total, args.days))
/// });
/// ```
pub struct FunctionRegistry {
    functions: HashMap<String, AsyncToolFn>,
    declarations: Vec<ToolDeclaration>,
}

impl FunctionRegistry {
    /// Create a new empty function registry
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
            declarations: Vec::new(),
        }
    }

    /// Register an async function that returns a serializable result
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the tool (must match what's declared to the LLM)
    /// * `func` - The async function to execute
    pub fn register_async<F, Args, R, Fut>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Args: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        Fut: Future<Output = Result<R, String>> + Send + 'static,
    {
        let wrapper = move |args_json: serde_json::Value| {
            // Deserialize arguments
            let args = match serde_json::from_value::<Args>(args_json) {
                Ok(args) => args,
                Err(e) => {
                    let err_msg = format!("Failed to deserialize arguments: {}", e);
                    return Box::pin(async move { Err(err_msg) }) as BoxFuture<'static, _>;
                }
            };

            let future = func(args);

            Box::pin(async move {
                match future.await {
                    Ok(result) => serde_json::to_string(&result)
                        .map_err(|e| format!("Failed to serialize result: {}", e)),
                    Err(e) => Err(e),
                }
            }) as BoxFuture<'static, _>
        };

        self.functions.insert(name.into(), Box::new(wrapper));
    }

    /// Register a synchronous function that returns a serializable result
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the tool (must match what's declared to the LLM)
    /// * `func` - The synchronous function to execute
    pub fn register_sync<F, Args, R>(&mut self, name: impl Into<String>, func: F)
    where
        F: Fn(Args) -> Result<R, String> + Send + Sync + 'static,
        Args: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
    {
        let wrapper = move |args_json: serde_json::Value| {
            // Deserialize arguments
            let args = match serde_json::from_value::<Args>(args_json) {
                Ok(args) => args,
                Err(e) => {
                    let err_msg = format!("Failed to deserialize arguments: {}", e);
                    return Box::pin(async move { Err(err_msg) }) as BoxFuture<'static, _>;
                }
            };

            let result = func(args).and_then(|r| {
                serde_json::to_string(&r).map_err(|e| format!("Failed to serialize result: {}", e))
            });

            Box::pin(async move { result }) as BoxFuture<'static, _>
        };

        self.functions.insert(name.into(), Box::new(wrapper));
    }

    /// Register an async function together with its declaration
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTool` if the declaration's name is already taken.
    pub fn register_async_tool<F, Args, R, Fut>(
        &mut self,
        declaration: ToolDeclaration,
        func: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Args: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        Fut: Future<Output = Result<R, String>> + Send + 'static,
    {
        self.ensure_vacant(&declaration.name)?;
        self.register_async(declaration.name.clone(), func);
        self.push_declaration(declaration);
        Ok(())
    }

    /// Register a synchronous function together with its declaration
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTool` if the declaration's name is already taken.
    pub fn register_sync_tool<F, Args, R>(
        &mut self,
        declaration: ToolDeclaration,
        func: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(Args) -> Result<R, String> + Send + Sync + 'static,
        Args: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
    {
        self.ensure_vacant(&declaration.name)?;
        self.register_sync(declaration.name.clone(), func);
        self.push_declaration(declaration);
        Ok(())
    }

    /// Register a tool produced by the `#[tool]` macro
    ///
    /// ```ignore
    /// registry.register(multiply_tool::registration())?;
    /// ```
    pub fn register(&mut self, registration: ToolRegistration) -> Result<(), RegistryError> {
        self.ensure_vacant(registration.name)?;
        self.functions
            .insert(registration.name.to_string(), registration.function);
        self.push_declaration(registration.declaration);
        Ok(())
    }

    /// Declarations of every tool registered with one
    pub fn get_declarations(&self) -> Vec<ToolDeclaration> {
        self.declarations.clone()
    }

    /// Check if a function is registered
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Get the number of registered functions
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    fn ensure_vacant(&self, name: &str) -> Result<(), RegistryError> {
        if self.functions.contains_key(name) {
            return Err(RegistryError::DuplicateTool(name.to_string()));
        }
        Ok(())
    }

    fn push_declaration(&mut self, declaration: ToolDeclaration) {
        debug!(tool = %declaration.name, "registered tool");
        self.declarations.push(declaration);
    }

    /// Execute a registered function by name
    async fn execute_function(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<String, String> {
        match self.functions.get(name) {
            Some(func) => func(arguments).await,
            None => Err(format!("Unknown tool: {}", name)),
        }
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for FunctionRegistry {
    async fn execute(
        &self,
        tool_use_id: String,
        name: String,
        arguments: serde_json::Value,
    ) -> Result<String, String> {
        let result = self.execute_function(&name, arguments).await;
        if let Err(error) = &result {
            warn!(tool = %name, %tool_use_id, %error, "tool execution failed");
        }
        result
    }
}
