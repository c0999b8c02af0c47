//! Error types for the Cellgraph engine.

use thiserror::Error;

use crate::engine::Position;
use crate::formula::ParseError;

/// Structural failures of a grid operation.
///
/// Every variant leaves the grid exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid position: row {}, column {}", .0.row, .0.col)]
    InvalidPosition(Position),

    #[error("Formula syntax error: {0}")]
    FormulaSyntax(#[from] ParseError),

    #[error("Circular dependency: {cell} cannot reference {reference}")]
    CircularDependency { cell: Position, reference: Position },
}

pub type Result<T> = std::result::Result<T, EngineError>;
