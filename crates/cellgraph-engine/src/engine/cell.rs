//! Cell data structures for the spreadsheet grid.
//!
//! This module provides the per-cell types:
//! - [`Content`] - What a cell holds (empty, text, or formula with its result cache)
//! - [`Cell`] - A graph node: content plus the positions of cells that depend on it

use std::cell::OnceCell;
use std::collections::BTreeSet;

use super::cell_ref::Position;
use super::eval::evaluate_formula;
use super::grid::Grid;
use super::value::Value;
use crate::error::Result;
use crate::formula::Expression;

/// Leading character that marks input as a formula.
pub const FORMULA_SIGN: char = '=';
/// Leading character that forces input to be kept as text.
pub const ESCAPE_SIGN: char = '\'';

/// A formula together with its memoized result.
#[derive(Debug)]
pub struct FormulaContent {
    expression: Expression,
    references: Vec<Position>,
    cache: OnceCell<Value>,
}

impl FormulaContent {
    fn new(expression: Expression) -> FormulaContent {
        FormulaContent {
            references: expression.referenced_positions(),
            expression,
            cache: OnceCell::new(),
        }
    }
}

/// The content stored in a cell.
#[derive(Debug, Default)]
pub enum Content {
    #[default]
    Empty,
    Text(String),
    Formula(FormulaContent),
}

impl Content {
    /// Build content from user input.
    /// - Empty string -> Empty
    /// - `=` followed by at least one character -> Formula (parse errors are returned)
    /// - Otherwise -> Text, verbatim
    pub fn from_input(input: &str) -> Result<Content> {
        if input.is_empty() {
            return Ok(Content::Empty);
        }
        if let Some(formula) = input.strip_prefix(FORMULA_SIGN)
            && !formula.is_empty()
        {
            let expression = Expression::parse(formula)?;
            return Ok(Content::Formula(FormulaContent::new(expression)));
        }
        Ok(Content::Text(input.to_string()))
    }

    /// Raw text as the user would edit it.
    pub fn text(&self) -> String {
        match self {
            Content::Empty => String::new(),
            Content::Text(s) => s.clone(),
            Content::Formula(f) => format!("{}{}", FORMULA_SIGN, f.expression),
        }
    }

    /// Positions this content reads from, sorted and deduplicated.
    pub fn referenced_cells(&self) -> &[Position] {
        match self {
            Content::Formula(f) => &f.references,
            Content::Empty | Content::Text(_) => &[],
        }
    }

    pub(crate) fn value(&self, grid: &Grid) -> Value {
        match self {
            Content::Empty => Value::Number(0.0),
            Content::Text(s) => {
                let shown = s.strip_prefix(ESCAPE_SIGN).unwrap_or(s.as_str());
                Value::Text(shown.to_string())
            }
            Content::Formula(f) => f
                .cache
                .get_or_init(|| evaluate_formula(&f.expression, &f.references, grid))
                .clone(),
        }
    }

    /// Drop the memoized result. Returns true if there was one.
    pub(crate) fn clear_cache(&mut self) -> bool {
        match self {
            Content::Formula(f) => f.cache.take().is_some(),
            Content::Empty | Content::Text(_) => false,
        }
    }
}

/// A cell in the spreadsheet grid.
#[derive(Debug, Default)]
pub struct Cell {
    content: Content,
    /// Cells whose formulas reference this one.
    dependents: BTreeSet<Position>,
}

impl Cell {
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Current value, evaluating and memoizing a formula if needed.
    pub fn value(&self, grid: &Grid) -> Value {
        self.content.value(grid)
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn referenced_cells(&self) -> Vec<Position> {
        self.content.referenced_cells().to_vec()
    }

    pub fn dependents(&self) -> impl Iterator<Item = &Position> {
        self.dependents.iter()
    }

    pub fn has_dependents(&self) -> bool {
        !self.dependents.is_empty()
    }

    /// True for formula cells holding a memoized result.
    pub fn is_cached(&self) -> bool {
        matches!(&self.content, Content::Formula(f) if f.cache.get().is_some())
    }

    pub(crate) fn replace_content(&mut self, content: Content) -> Content {
        std::mem::replace(&mut self.content, content)
    }

    pub(crate) fn add_dependent(&mut self, pos: Position) {
        self.dependents.insert(pos);
    }

    pub(crate) fn remove_dependent(&mut self, pos: &Position) {
        self.dependents.remove(pos);
    }

    pub(crate) fn invalidate_cache(&mut self) -> bool {
        self.content.clear_cache()
    }
}
