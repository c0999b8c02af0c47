//! Parser for .grd file format

use crate::error::{CoreError, Result};
use cellgraph_engine::engine::{Grid, Position};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Load a .grd file into a new Grid
pub fn load_grd(path: &Path) -> Result<Grid> {
    let content = fs::read_to_string(path)?;
    let grid = parse_grd_content(&content)?;
    debug!(path = %path.display(), cells = grid.len(), "loaded sheet");
    Ok(grid)
}

/// Parse .grd content from a string.
///
/// Lines are applied in order, so a formula may reference cells defined
/// further down. Engine failures (bad formula, cycle) report their line.
pub fn parse_grd_content(content: &str) -> Result<Grid> {
    let mut grid = Grid::new();

    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Parse "CELLREF: VALUE" format
        let Some((pos_str, value_str)) = line.split_once(':') else {
            return Err(CoreError::Parse {
                line: line_num + 1,
                message: "Expected 'CELLREF: VALUE' format".to_string(),
            });
        };

        let pos_str = pos_str.trim();
        let pos = Position::from_a1(pos_str).ok_or_else(|| CoreError::Parse {
            line: line_num + 1,
            message: format!("Invalid cell reference: {}", pos_str),
        })?;

        let input = parse_cell_input(value_str, line_num + 1)?;
        grid.set_cell(pos, &input).map_err(|e| CoreError::Parse {
            line: line_num + 1,
            message: e.to_string(),
        })?;
    }

    Ok(grid)
}

/// Turn the value part of a line into the raw text a user would type.
fn parse_cell_input(value: &str, line_num: usize) -> Result<String> {
    let value = value.trim();

    if value.is_empty() {
        return Ok(String::new());
    }

    // Formula: starts with '='
    if value.starts_with('=') {
        return Ok(value.to_string());
    }

    // Quoted string: starts and ends with '"'
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        let text = &value[1..value.len() - 1];
        return Ok(unescape_grd_text(text));
    }

    // Bare numbers are stored as their text
    if value.parse::<f64>().is_ok() {
        return Ok(value.to_string());
    }

    Err(CoreError::Parse {
        line: line_num,
        message: format!("Invalid value: {}. Use quotes for text.", value),
    })
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            } else {
                out.push('\\');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
