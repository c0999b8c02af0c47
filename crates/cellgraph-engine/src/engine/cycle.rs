//! Circular dependency detection for formula cells.
//!
//! Before a formula is committed we must verify it doesn't close a loop
//! (e.g., A1 references B1, B1 references C1, C1 references A1). Anything that
//! already depends on the target, directly or transitively, must not be
//! referenced by the target's new formula.

use std::collections::HashSet;

use super::{Grid, Position};

/// Check whether giving `target` a formula that reads `references` would
/// create a cycle.
///
/// Returns the first offending reference, or `None` if the edit is safe.
/// References to positions with no materialized cell are ignored (nothing can
/// depend on them yet), except `target` itself.
pub fn detect_cycle(grid: &Grid, target: Position, references: &[Position]) -> Option<Position> {
    let targets: HashSet<Position> = references
        .iter()
        .copied()
        .filter(|pos| *pos == target || grid.resolve(*pos).is_some())
        .collect();
    if targets.is_empty() {
        return None;
    }

    let mut visited = HashSet::new();
    let mut stack = vec![target];
    while let Some(current) = stack.pop() {
        if targets.contains(&current) {
            return Some(current);
        }
        if !visited.insert(current) {
            continue;
        }
        if let Some(cell) = grid.resolve(current) {
            stack.extend(cell.dependents().filter(|dep| !visited.contains(*dep)).copied());
        }
    }
    None
}
