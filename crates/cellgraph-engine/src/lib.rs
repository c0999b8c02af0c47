//! cellgraph_engine - Spreadsheet engine: formulas, dependency graph, lazy evaluation.

pub mod engine;
pub mod error;
pub mod formula;

pub use error::{EngineError, Result};

#[cfg(test)]
mod tests {
    use crate::engine::*;
    use crate::error::EngineError;

    fn pos(name: &str) -> Position {
        Position::from_a1(name).unwrap()
    }

    fn value(grid: &Grid, name: &str) -> Value {
        grid.value(pos(name)).unwrap().expect("cell should exist")
    }

    fn text(grid: &Grid, name: &str) -> String {
        grid.text(pos(name)).unwrap().unwrap_or_default()
    }

    #[test]
    fn test_self_reference_keeps_previous_content() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "42").unwrap();

        let err = grid.set_cell(pos("A1"), "=A1").unwrap_err();
        assert!(matches!(err, EngineError::CircularDependency { .. }));
        assert_eq!(text(&grid, "A1"), "42");
        assert_eq!(value(&grid, "A1"), Value::Text("42".to_string()));
    }

    #[test]
    fn test_two_cycle_keeps_existing_edge() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "=B1").unwrap();

        let err = grid.set_cell(pos("B1"), "=A1").unwrap_err();
        assert_eq!(
            err,
            EngineError::CircularDependency {
                cell: pos("B1"),
                reference: pos("A1")
            }
        );
        assert_eq!(grid.referenced_cells(pos("A1")).unwrap(), vec![pos("B1")]);
        assert_eq!(text(&grid, "B1"), "");

        grid.set_cell(pos("B1"), "3").unwrap();
        assert_eq!(value(&grid, "A1"), Value::Number(3.0));
    }

    #[test]
    fn test_three_cycle_rejected() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "=B1").unwrap();
        grid.set_cell(pos("B1"), "=C1").unwrap();

        assert!(grid.set_cell(pos("C1"), "=A1+1").is_err());
        assert!(grid.set_cell(pos("C1"), "=D1+1").is_ok());
    }

    #[test]
    fn test_error_propagation_then_recovery() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "abc").unwrap();
        grid.set_cell(pos("B1"), "=A1+1").unwrap();
        assert_eq!(value(&grid, "B1"), Value::Error(ErrorCategory::BadValue));

        grid.set_cell(pos("A1"), "5").unwrap();
        assert_eq!(value(&grid, "B1"), Value::Number(6.0));
    }

    #[test]
    fn test_error_flows_through_chain() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "=1/0").unwrap();
        grid.set_cell(pos("A2"), "=A1+1").unwrap();
        grid.set_cell(pos("A3"), "=A2*2").unwrap();
        assert_eq!(value(&grid, "A3"), Value::Error(ErrorCategory::DivideByZero));
        assert_eq!(value(&grid, "A3").to_string(), "#DIV/0!");
    }

    #[test]
    fn test_bad_reference() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "=A99999+1").unwrap();
        assert_eq!(value(&grid, "A1"), Value::Error(ErrorCategory::BadReference));
        assert_eq!(text(&grid, "A1"), "=#REF!+1");
        assert!(grid.referenced_cells(pos("A1")).unwrap().is_empty());
    }

    #[test]
    fn test_placeholder_creation() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "=Z9").unwrap();

        let z9 = grid.resolve(pos("Z9")).expect("Z9 should be materialized");
        assert_eq!(z9.value(&grid), Value::Number(0.0));
        assert_eq!(z9.text(), "");
        assert_eq!(value(&grid, "A1"), Value::Number(0.0));

        grid.clear_cell(pos("A1")).unwrap();
        assert!(grid.resolve(pos("Z9")).is_some());
    }

    #[test]
    fn test_cascading_invalidation_depth() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "1").unwrap();
        grid.set_cell(pos("B1"), "=A1+1").unwrap();
        grid.set_cell(pos("C1"), "=B1+1").unwrap();
        grid.set_cell(pos("D1"), "=C1+1").unwrap();
        assert_eq!(value(&grid, "D1"), Value::Number(4.0));

        grid.set_cell(pos("A1"), "10").unwrap();
        for name in ["B1", "C1", "D1"] {
            assert!(!grid.resolve(pos(name)).unwrap().is_cached());
        }
        assert_eq!(value(&grid, "D1"), Value::Number(13.0));
    }

    #[test]
    fn test_round_trip_text_and_formula() {
        let mut grid = Grid::new();
        grid.set_cell(pos("B1"), "2").unwrap();
        for input in [
            "plain",
            "'=escaped",
            "'",
            "=",
            "=(B1+1)*-B1",
            "= 1 / ( 2 - B1 )",
            "=0.1+(0.2+0.3)",
            "=B1*(B1*0.1)",
        ] {
            grid.set_cell(pos("A1"), input).unwrap();
            let before_text = text(&grid, "A1");
            let before_value = value(&grid, "A1");
            let before_refs = grid.referenced_cells(pos("A1")).unwrap();

            grid.set_cell(pos("A1"), &before_text).unwrap();
            assert_eq!(text(&grid, "A1"), before_text);
            assert_eq!(value(&grid, "A1"), before_value);
            assert_eq!(grid.referenced_cells(pos("A1")).unwrap(), before_refs);
        }
    }

    #[test]
    fn test_empty_input_makes_cell_empty() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "text").unwrap();
        grid.set_cell(pos("A1"), "").unwrap();
        assert_eq!(text(&grid, "A1"), "");
        assert_eq!(value(&grid, "A1"), Value::Number(0.0));
    }

    #[test]
    fn test_digit_text_coerces() {
        let mut grid = Grid::new();
        grid.set_cell(pos("A1"), "12").unwrap();
        grid.set_cell(pos("A2"), "").unwrap();
        grid.set_cell(pos("A3"), "=A1+A2+A4").unwrap();
        assert_eq!(value(&grid, "A3"), Value::Number(12.0));
    }
}
