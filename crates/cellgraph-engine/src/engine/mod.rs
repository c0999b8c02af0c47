//! Spreadsheet engine API.
//!
//! This module provides the dependency-tracking computation core:
//!
//! - [`Grid`] - Sparse cell storage and the mutation entry points
//! - [`Cell`], [`Content`] - Graph nodes and what they hold
//! - [`Position`] - Cell addresses (A1 notation <-> row/col indices)
//! - [`Value`], [`ErrorCategory`] - Observable results of cells
//! - [`detect_cycle`] - Circular dependency detection
//! - [`format_number`] - Format numbers for display

mod cell;
mod cell_ref;
mod cycle;
mod eval;
mod format;
mod grid;
mod value;

pub use cell::{Cell, Content, ESCAPE_SIGN, FORMULA_SIGN, FormulaContent};
pub use cell_ref::{MAX_COLS, MAX_ROWS, Position, Size};
pub use cycle::detect_cycle;
pub use format::format_number;
pub use grid::Grid;
pub use value::{ErrorCategory, Value};
