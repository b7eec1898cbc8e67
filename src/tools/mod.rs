//! Trip-planning tools offered to the model
//!
//! Each tool wraps one of the crate's helpers and registers itself into a
//! [`FunctionRegistry`](crate::llm::FunctionRegistry) together with its
//! declaration.

pub mod calculator;
pub mod currency;

pub use calculator::ExpenseCalculatorTool;
pub use currency::CurrencyConverterTool;
