/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        "#NUM!".to_string()
    } else if n == 0.0 {
        // Covers negative zero from unary minus on an empty cell.
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}
