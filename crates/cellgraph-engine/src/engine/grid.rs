//! Sparse cell storage and the mutation entry points.
//!
//! The grid is an arena keyed by [`Position`]. Dependency edges are stored as
//! positions inside each [`Cell`], so every lookup goes through the map.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::cell::{Cell, Content};
use super::cell_ref::{Position, Size};
use super::cycle::detect_cycle;
use super::value::Value;
use crate::error::{EngineError, Result};

/// Sparse grid storage.
#[derive(Debug, Default)]
pub struct Grid {
    cells: HashMap<Position, Cell>,
}

fn ensure_valid(pos: Position) -> Result<()> {
    if pos.is_valid() {
        Ok(())
    } else {
        Err(EngineError::InvalidPosition(pos))
    }
}

impl Grid {
    pub fn new() -> Grid {
        Grid::default()
    }

    /// Set cell contents from input text.
    ///
    /// Fails without touching the grid on an invalid position, a formula
    /// syntax error, or a formula that would create a circular dependency.
    pub fn set_cell(&mut self, pos: Position, input: &str) -> Result<()> {
        ensure_valid(pos)?;
        let content = Content::from_input(input)?;
        let references = content.referenced_cells().to_vec();

        if let Some(reference) = detect_cycle(self, pos, &references) {
            debug!(cell = %pos, %reference, "rejected circular formula");
            return Err(EngineError::CircularDependency {
                cell: pos,
                reference,
            });
        }

        let old = self.materialize(pos).replace_content(content);
        self.unlink_dropped(pos, old.referenced_cells(), &references);
        for reference in &references {
            self.materialize(*reference).add_dependent(pos);
        }
        self.invalidate(pos);

        debug!(cell = %pos, references = references.len(), "cell set");
        Ok(())
    }

    /// Clear the specified cell.
    ///
    /// Cells that reference this position keep their links and now read it as
    /// empty. The entry itself is dropped once nothing depends on it.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        ensure_valid(pos)?;
        let Some(cell) = self.cells.get_mut(&pos) else {
            return Ok(());
        };
        let old = cell.replace_content(Content::Empty);
        self.unlink_dropped(pos, old.referenced_cells(), &[]);
        self.invalidate(pos);

        if self.cells.get(&pos).is_some_and(|cell| !cell.has_dependents()) {
            self.cells.remove(&pos);
        }
        debug!(cell = %pos, "cell cleared");
        Ok(())
    }

    /// The cell at `pos`, if one is materialized.
    pub fn resolve(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// Like [`Grid::resolve`], but rejects positions outside the grid.
    pub fn cell(&self, pos: Position) -> Result<Option<&Cell>> {
        ensure_valid(pos)?;
        Ok(self.resolve(pos))
    }

    pub fn value(&self, pos: Position) -> Result<Option<Value>> {
        Ok(self.cell(pos)?.map(|cell| cell.value(self)))
    }

    pub fn text(&self, pos: Position) -> Result<Option<String>> {
        Ok(self.cell(pos)?.map(Cell::text))
    }

    pub fn referenced_cells(&self, pos: Position) -> Result<Vec<Position>> {
        Ok(self
            .cell(pos)?
            .map(Cell::referenced_cells)
            .unwrap_or_default())
    }

    /// Materialized positions in row-major order.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<_> = self.cells.keys().copied().collect();
        positions.sort();
        positions
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bounding box of all cells with non-empty text.
    pub fn printable_size(&self) -> Size {
        self.cells
            .iter()
            .filter(|(_, cell)| !matches!(cell.content(), Content::Empty))
            .fold(Size::default(), |size, (pos, _)| Size {
                rows: size.rows.max(pos.row + 1),
                cols: size.cols.max(pos.col + 1),
            })
    }

    /// Create an empty cell at `pos` if none exists.
    fn materialize(&mut self, pos: Position) -> &mut Cell {
        self.cells.entry(pos).or_insert_with(|| {
            trace!(cell = %pos, "materialized cell");
            Cell::default()
        })
    }

    /// Remove `pos` from the dependents of cells it no longer references.
    fn unlink_dropped(&mut self, pos: Position, old: &[Position], new: &[Position]) {
        for stale in old.iter().filter(|p| !new.contains(p)) {
            if let Some(cell) = self.cells.get_mut(stale) {
                cell.remove_dependent(&pos);
            }
        }
    }

    /// Clear memoized results of `origin` and everything that depends on it.
    pub(crate) fn invalidate(&mut self, origin: Position) {
        let mut stack = vec![origin];
        let mut visited = HashSet::new();
        let mut cleared = 0usize;
        while let Some(pos) = stack.pop() {
            if !visited.insert(pos) {
                continue;
            }
            let Some(cell) = self.cells.get_mut(&pos) else {
                continue;
            };
            if cell.invalidate_cache() {
                cleared += 1;
            }
            stack.extend(cell.dependents().copied());
        }
        trace!(cell = %origin, visited = visited.len(), cleared, "invalidated caches");
    }

    /// Fill the caches of uncached formulas among `references` and their
    /// inputs, deepest first.
    ///
    /// Each cell is evaluated only after everything it reads is cached, so a
    /// long chain never nests evaluation more than one level deep.
    pub(crate) fn prime_precedents(&self, references: &[Position]) {
        let mut stack: Vec<(Position, bool)> = references.iter().map(|&p| (p, false)).collect();
        let mut visited = HashSet::new();
        while let Some((pos, inputs_ready)) = stack.pop() {
            let Some(cell) = self.cells.get(&pos) else {
                continue;
            };
            if inputs_ready {
                cell.value(self);
                continue;
            }
            if !matches!(cell.content(), Content::Formula(_))
                || cell.is_cached()
                || !visited.insert(pos)
            {
                continue;
            }
            stack.push((pos, true));
            stack.extend(cell.content().referenced_cells().iter().map(|&p| (p, false)));
        }
        if !visited.is_empty() {
            trace!(evaluated = visited.len(), "primed formula inputs");
        }
    }
}
