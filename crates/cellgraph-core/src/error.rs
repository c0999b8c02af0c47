//! Error types for Cellgraph core.

use thiserror::Error;

use cellgraph_engine::EngineError;

/// Errors that can occur while loading, saving, or editing a sheet.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
