//! Formula evaluation against the grid.
//!
//! Each reference is coerced to a number; the first failure becomes the
//! formula's result.

use super::cell_ref::Position;
use super::grid::Grid;
use super::value::{ErrorCategory, Value};

/// Evaluate a formula, reading referenced cells from `grid`.
pub(crate) fn evaluate_formula(
    expression: &crate::formula::Expression,
    references: &[Position],
    grid: &Grid,
) -> Value {
    grid.prime_precedents(references);
    expression.evaluate(|pos| resolve_number(grid, pos)).into()
}

/// Coerce the value at `pos` to a number for arithmetic.
pub(crate) fn resolve_number(grid: &Grid, pos: Position) -> Result<f64, ErrorCategory> {
    if !pos.is_valid() {
        return Err(ErrorCategory::BadReference);
    }
    let Some(cell) = grid.resolve(pos) else {
        return Ok(0.0);
    };
    match cell.value(grid) {
        Value::Number(n) => Ok(n),
        Value::Error(e) => Err(e),
        Value::Text(s) => text_to_number(&s),
    }
}

fn text_to_number(text: &str) -> Result<f64, ErrorCategory> {
    if text.is_empty() {
        return Ok(0.0);
    }
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ErrorCategory::BadValue);
    }
    match text.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ErrorCategory::BadValue),
    }
}
