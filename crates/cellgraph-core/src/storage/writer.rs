//! Writer for .grd file format

use crate::error::Result;
use cellgraph_engine::engine::{Content, Grid};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Write a Grid to a .grd file
pub fn write_grd(path: &Path, grid: &Grid) -> Result<()> {
    let content = write_grd_content(grid);
    fs::write(path, content)?;
    debug!(path = %path.display(), "saved sheet");
    Ok(())
}

/// Write a Grid to a .grd format string, cells in row-major order
pub fn write_grd_content(grid: &Grid) -> String {
    let mut lines = vec!["# cellgraph sheet".to_string()];

    for pos in grid.positions() {
        let Some(cell) = grid.resolve(pos) else {
            continue;
        };
        let value_str = match cell.content() {
            Content::Empty => continue, // Skip placeholders and cleared cells
            Content::Text(s) => format!("\"{}\"", escape_grd_text(s)),
            Content::Formula(_) => cell.text(),
        };

        lines.push(format!("{}: {}", pos, value_str));
    }

    lines.join("\n") + "\n"
}

fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}
