//! Formula language: parsing, canonical printing, and evaluation.
//!
//! The grid only talks to this module through [`Expression`]:
//!
//! - [`Expression::parse`] - build an expression from formula text (without `=`)
//! - [`Expression::evaluate`] - compute a number, resolving cells through a callback
//! - [`Expression::referenced_positions`] - sorted, deduplicated valid references
//! - `Display` - canonical formula text

mod ast;
mod parser;

use std::fmt;

use thiserror::Error;

use crate::engine::{ErrorCategory, Position};

use ast::Expr;

/// Formula text rejected by the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at offset {offset}")]
pub struct ParseError {
    pub message: String,
    /// Byte offset into the formula text (excluding the leading `=`).
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        ParseError {
            message: message.into(),
            offset,
        }
    }
}

/// A parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    root: Expr,
}

impl Expression {
    pub fn parse(text: &str) -> Result<Expression, ParseError> {
        Ok(Expression {
            root: parser::parse(text)?,
        })
    }

    /// Evaluate the formula.
    ///
    /// `resolve` maps each referenced position (including invalid ones) to a
    /// number or an error; the first error ends evaluation and becomes the
    /// result. Non-finite arithmetic yields [`ErrorCategory::DivideByZero`].
    pub fn evaluate<F>(&self, resolve: F) -> Result<f64, ErrorCategory>
    where
        F: Fn(Position) -> Result<f64, ErrorCategory>,
    {
        self.root.evaluate(&resolve)
    }

    /// Valid cell references, sorted row-major and deduplicated.
    pub fn referenced_positions(&self) -> Vec<Position> {
        let mut cells = Vec::new();
        self.root.collect_cells(&mut cells);
        cells.retain(Position::is_valid);
        cells.sort();
        cells.dedup();
        cells
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(text: &str) -> String {
        Expression::parse(text).unwrap().to_string()
    }

    fn eval(text: &str) -> Result<f64, ErrorCategory> {
        Expression::parse(text).unwrap().evaluate(|_| Ok(0.0))
    }

    #[test]
    fn test_canonical_drops_redundant_parens() {
        assert_eq!(canonical("(A1)"), "A1");
        assert_eq!(canonical("(1+2)+3"), "1+2+3");
        assert_eq!(canonical("1+(2*3)"), "1+2*3");
        assert_eq!(canonical(" A1 * ( B2 ) "), "A1*B2");
    }

    #[test]
    fn test_canonical_keeps_required_parens() {
        assert_eq!(canonical("(1+2)*3"), "(1+2)*3");
        assert_eq!(canonical("1-(2-3)"), "1-(2-3)");
        assert_eq!(canonical("1-(2+3)"), "1-(2+3)");
        assert_eq!(canonical("8/(4/2)"), "8/(4/2)");
        assert_eq!(canonical("8/(4*2)"), "8/(4*2)");
        assert_eq!(canonical("1+(2+3)"), "1+(2+3)");
        assert_eq!(canonical("A1*(B1*C1)"), "A1*(B1*C1)");
        assert_eq!(canonical("-(A1+1)"), "-(A1+1)");
        assert_eq!(canonical("-(A1*2)"), "-(A1*2)");
        assert_eq!(canonical("2*-A1"), "2*-A1");
    }

    #[test]
    fn test_canonical_reparses_to_same_tree() {
        for text in [
            "(1+2)*(3-4)/-5",
            "1-(2-(3-4))",
            "+A1--B2",
            "1.5e3/.25",
            "#REF!+A99999",
            "0.1+(0.2+0.3)",
            "A1*(B1*C1)",
        ] {
            let first = Expression::parse(text).unwrap();
            let second = Expression::parse(&first.to_string()).unwrap();
            assert_eq!(first, second, "canonical form of {:?} changed meaning", text);
        }
    }

    #[test]
    fn test_evaluate_arithmetic() {
        assert_eq!(eval("1+2*3"), Ok(7.0));
        assert_eq!(eval("(1+2)*3"), Ok(9.0));
        assert_eq!(eval("-2*-3"), Ok(6.0));
        assert_eq!(eval("7/2"), Ok(3.5));
    }

    #[test]
    fn test_evaluate_non_finite_is_divide_by_zero() {
        assert_eq!(eval("1/0"), Err(ErrorCategory::DivideByZero));
        assert_eq!(eval("0/0"), Err(ErrorCategory::DivideByZero));
        assert_eq!(eval("1e308*10"), Err(ErrorCategory::DivideByZero));
    }

    #[test]
    fn test_evaluate_resolver_error_short_circuits() {
        let expr = Expression::parse("A1+B1").unwrap();
        let result = expr.evaluate(|pos| {
            if pos == Position::new(0, 0) {
                Err(ErrorCategory::BadValue)
            } else {
                Err(ErrorCategory::BadReference)
            }
        });
        assert_eq!(result, Err(ErrorCategory::BadValue));
    }

    #[test]
    fn test_referenced_positions_sorted_dedup_valid_only() {
        let expr = Expression::parse("B2+A1+B2+A99999+#REF!+A2").unwrap();
        assert_eq!(
            expr.referenced_positions(),
            vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)]
        );
    }
}
