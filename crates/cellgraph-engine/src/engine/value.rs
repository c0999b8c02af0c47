//! Observable cell values and the formula error taxonomy.

use std::fmt;

use super::format::format_number;

/// Value-level failures produced while evaluating a formula.
///
/// These are data, not control flow: they surface as [`Value::Error`] and
/// flow through every formula that references the failing cell.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ErrorCategory {
    DivideByZero,
    BadReference,
    BadValue,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::DivideByZero => "#DIV/0!",
            ErrorCategory::BadReference => "#REF!",
            ErrorCategory::BadValue => "#VALUE!",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The computed result of a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Error(ErrorCategory),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Result<f64, ErrorCategory>> for Value {
    fn from(result: Result<f64, ErrorCategory>) -> Self {
        match result {
            Ok(n) => Value::Number(n),
            Err(e) => Value::Error(e),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
            Value::Error(e) => f.write_str(e.as_str()),
        }
    }
}
