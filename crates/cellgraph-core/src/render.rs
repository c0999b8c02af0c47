//! Text rendering of the printable area of a grid.

use cellgraph_engine::engine::{Grid, Position};
use std::io::{self, Write};

/// Print cell values, tab-separated, one line per row.
pub fn print_values<W: Write>(grid: &Grid, out: &mut W) -> io::Result<()> {
    print_cells(grid, out, |grid, pos| {
        grid.resolve(pos)
            .map(|cell| cell.value(grid).to_string())
            .unwrap_or_default()
    })
}

/// Print cell texts (formulas as written), tab-separated, one line per row.
pub fn print_texts<W: Write>(grid: &Grid, out: &mut W) -> io::Result<()> {
    print_cells(grid, out, |grid, pos| {
        grid.resolve(pos).map(|cell| cell.text()).unwrap_or_default()
    })
}

fn print_cells<W, F>(grid: &Grid, out: &mut W, render: F) -> io::Result<()>
where
    W: Write,
    F: Fn(&Grid, Position) -> String,
{
    let size = grid.printable_size();
    for row in 0..size.rows {
        for col in 0..size.cols {
            if col > 0 {
                write!(out, "\t")?;
            }
            write!(out, "{}", render(grid, Position::new(row, col)))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write cell values as a markdown table with column letters and row numbers.
pub fn write_markdown<W: Write>(grid: &Grid, out: &mut W) -> io::Result<()> {
    let size = grid.printable_size();
    if size.rows == 0 {
        writeln!(out, "*Empty spreadsheet*")?;
        return Ok(());
    }

    write!(out, "|   |")?;
    for col in 0..size.cols {
        write!(out, " {} |", Position::col_to_letters(col))?;
    }
    writeln!(out)?;

    write!(out, "|---|")?;
    for _ in 0..size.cols {
        write!(out, "---|")?;
    }
    writeln!(out)?;

    for row in 0..size.rows {
        write!(out, "| {} |", row + 1)?; // 1-based row numbers
        for col in 0..size.cols {
            let display = grid
                .resolve(Position::new(row, col))
                .map(|cell| cell.value(grid).to_string())
                .unwrap_or_default();
            write!(out, " {} |", escape_markdown(&display))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn escape_markdown(s: &str) -> String {
    s.replace('\\', "\\\\").replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Position {
        Position::from_a1(name).unwrap()
    }

    fn render<F>(grid: &Grid, f: F) -> String
    where
        F: Fn(&Grid, &mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        f(grid, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn sample() -> Grid {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "=1/0").unwrap();
        grid.set_cell(pos("C1"), "'label").unwrap();
        grid.set_cell(pos("B2"), "=A2+3").unwrap();
        grid
    }

    #[test]
    fn test_print_values() {
        let grid = sample();
        // A2 is a materialized placeholder for B2's formula, so it prints 0.
        assert_eq!(render(&grid, |g, o| print_values(g, o)), "#DIV/0!\t\tlabel\n0\t3\t\n");
    }

    #[test]
    fn test_print_texts() {
        let grid = sample();
        assert_eq!(render(&grid, |g, o| print_texts(g, o)), "=1/0\t\t'label\n\t=A2+3\t\n");
    }

    #[test]
    fn test_print_empty_grid() {
        let grid = Grid::new();
        assert_eq!(render(&grid, |g, o| print_values(g, o)), "");
        assert_eq!(render(&grid, |g, o| write_markdown(g, o)), "*Empty spreadsheet*\n");
    }

    #[test]
    fn test_placeholder_prints_as_zero_inside_area() {
        let mut grid = Grid::new();
        grid.set_cell(pos("B1"), "=A1").unwrap();
        // A1 is a materialized placeholder: its value is 0.
        assert_eq!(render(&grid, |g, o| print_values(g, o)), "0\t0\n");
        assert_eq!(render(&grid, |g, o| print_texts(g, o)), "\t=A1\n");
    }

    #[test]
    fn test_write_markdown() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "a|b").unwrap();
        grid.set_cell(pos("B1"), "=2*3").unwrap();
        assert_eq!(
            render(&grid, |g, o| write_markdown(g, o)),
            "|   | A | B |\n|---|---|---|\n| 1 | a\\|b | 6 |\n"
        );
    }
}
