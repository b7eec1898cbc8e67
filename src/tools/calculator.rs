//! Expense calculator tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use trip_planner_tool_macros::tool;

use crate::calculator;
use crate::llm::tools::{FunctionRegistry, RegistryError};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MultiplyArgs {
    /// The first integer
    pub a: i64,
    /// The second integer
    pub b: i64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct MultiplyResult {
    pub product: i64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CalculateTotalArgs {
    /// Costs to add up
    pub values: Vec<f64>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculateTotalResult {
    pub total: f64,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DailyBudgetArgs {
    /// Total cost of the trip
    pub total: f64,
    /// Total number of days
    pub days: i64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyBudgetResult {
    pub daily_budget: f64,
}

/// Multiply two integers
#[tool]
fn multiply(args: MultiplyArgs) -> Result<MultiplyResult, String> {
    if args.a.checked_mul(args.b).is_none() {
        return Err("Result does not fit in a 64-bit integer".to_string());
    }
    Ok(MultiplyResult {
        product: calculator::multiply(args.a, args.b),
    })
}

/// Calculate the sum of the given list of numbers
#[tool]
fn calculate_total(args: CalculateTotalArgs) -> Result<CalculateTotalResult, String> {
    Ok(CalculateTotalResult {
        total: calculator::calculate_total(&args.values),
    })
}

/// Calculate the daily budget from a total cost and a number of days
#[tool]
fn calculate_daily_budget(args: DailyBudgetArgs) -> Result<DailyBudgetResult, String> {
    Ok(DailyBudgetResult {
        daily_budget: calculator::calculate_daily_budget(args.total, args.days),
    })
}

/// The arithmetic tools: `multiply`, `calculate_total`, `calculate_daily_budget`
pub struct ExpenseCalculatorTool;

impl ExpenseCalculatorTool {
    /// Add every calculator tool to the registry
    ///
    /// # Errors
    ///
    /// Returns `DuplicateTool` if one of the names is already registered.
    pub fn register(registry: &mut FunctionRegistry) -> Result<(), RegistryError> {
        crate::register_tools!(
            registry,
            multiply_tool,
            calculate_total_tool,
            calculate_daily_budget_tool,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::tools::ToolExecutor;
    use serde_json::json;

    async fn call(
        registry: &FunctionRegistry,
        name: &str,
        args: serde_json::Value,
    ) -> Result<String, String> {
        registry.execute("call-1".to_string(), name.to_string(), args).await
    }

    #[test]
    fn test_declarations() {
        let mut registry = FunctionRegistry::new();
        ExpenseCalculatorTool::register(&mut registry).unwrap();

        let declarations = registry.get_declarations();
        let names: Vec<&str> = declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["multiply", "calculate_total", "calculate_daily_budget"]);
        assert_eq!(declarations[0].description, "Multiply two integers");
        assert!(declarations[2].input_schema["properties"].get("days").is_some());
    }

    #[test]
    fn test_register_twice_fails() {
        let mut registry = FunctionRegistry::new();
        ExpenseCalculatorTool::register(&mut registry).unwrap();

        let err = ExpenseCalculatorTool::register(&mut registry).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("multiply".to_string()));
    }

    #[tokio::test]
    async fn test_tools_execute() {
        let mut registry = FunctionRegistry::new();
        ExpenseCalculatorTool::register(&mut registry).unwrap();

        let product = call(&registry, "multiply", json!({"a": 3, "b": 4})).await.unwrap();
        assert_eq!(serde_json::from_str::<MultiplyResult>(&product).unwrap().product, 12);

        let total = call(&registry, "calculate_total", json!({"values": [1.5, 2.5, 3.0]}))
            .await
            .unwrap();
        assert_eq!(serde_json::from_str::<CalculateTotalResult>(&total).unwrap().total, 7.0);

        let daily = call(&registry, "calculate_daily_budget", json!({"total": 100.0, "days": 0}))
            .await
            .unwrap();
        assert_eq!(
            serde_json::from_str::<DailyBudgetResult>(&daily).unwrap().daily_budget,
            0.0
        );
    }

    #[tokio::test]
    async fn test_multiply_overflow() {
        let mut registry = FunctionRegistry::new();
        ExpenseCalculatorTool::register(&mut registry).unwrap();

        let err = call(&registry, "multiply", json!({"a": i64::MAX, "b": 2}))
            .await
            .unwrap_err();
        assert!(err.contains("64-bit"));
    }

    #[tokio::test]
    async fn test_bad_arguments() {
        let mut registry = FunctionRegistry::new();
        ExpenseCalculatorTool::register(&mut registry).unwrap();

        let err = call(&registry, "calculate_daily_budget", json!({"total": "lots"}))
            .await
            .unwrap_err();
        assert!(err.starts_with("Failed to deserialize arguments"));
    }
}
