//! Expense arithmetic used by the trip planner
//!
//! These are plain functions so they can be used directly; [`crate::tools`]
//! wraps them as tools for the model.

/// Multiply two integers
pub fn multiply(a: i64, b: i64) -> i64 {
    a * b
}

/// Sum a list of costs (0 for an empty list)
pub fn calculate_total(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Split a total evenly across `days`
///
/// Returns 0 when `days` is zero or negative.
pub fn calculate_daily_budget(total: f64, days: i64) -> f64 {
    if days > 0 {
        total / days as f64
    } else {
        0.0
    }
}
