//! Storage module for file I/O operations.
//!
//! Supports the line-based `.grd` format (`A1: =B1+1`, `A2: "text"`).

mod parser;
mod writer;

pub use parser::{load_grd, parse_grd_content};
pub use writer::{write_grd, write_grd_content};
