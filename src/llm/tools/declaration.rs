//! Tool declaration helpers using JSON Schema generation

use schemars::{schema_for, JsonSchema};

use crate::llm::core::types::ToolDeclaration;

/// Create a tool declaration from a type that implements JsonSchema
///
/// The argument struct's doc comments become property descriptions in the
/// generated schema, which is what the model reads.
///
/// # Example
///
/// ```ignore
/// use schemars::JsonSchema;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, JsonSchema)]
/// struct DailyBudgetArgs {
///     /// Total cost of the trip
///     total: f64,
///     /// Number of days
///     days: i64,
/// }
///
/// let decl = create_tool_declaration::<DailyBudgetArgs>(
///     "calculate_daily_budget",
///     "Calculate the budget for a single day",
/// );
/// ```
pub fn create_tool_declaration<T: JsonSchema>(
    name: impl Into<String>,
    description: impl Into<String>,
) -> ToolDeclaration {
    let schema = schema_for!(T);
    ToolDeclaration {
        name: name.into(),
        description: description.into(),
        input_schema: serde_json::to_value(&schema).expect("schemars schemas serialize to JSON"),
    }
}
