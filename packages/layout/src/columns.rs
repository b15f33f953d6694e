//! Assigning tokens to table columns by horizontal proximity.

use std::collections::BTreeMap;

use phl_courts_layout_models::Token;

/// One column label in a header row, with its horizontal position.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell<C> {
    /// The column this label names.
    pub column: C,
    /// Left edge of the label.
    pub x: f64,
}

/// A header row defining a column layout for the rows beneath it.
///
/// Always holds at least one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRow<C> {
    cells: Vec<HeaderCell<C>>,
}

impl<C: Clone + Ord> HeaderRow<C> {
    /// Builds a header row, returning `None` if `cells` is empty.
    #[must_use]
    pub fn new(cells: Vec<HeaderCell<C>>) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { cells })
        }
    }

    /// The header cells in row order.
    #[must_use]
    pub fn cells(&self) -> &[HeaderCell<C>] {
        &self.cells
    }

    /// The horizontal position of the first cell. Rows that start at this
    /// position are rows of this table.
    #[must_use]
    pub fn first_x(&self) -> f64 {
        self.cells[0].x
    }

    /// The columns in row order.
    pub fn columns(&self) -> impl Iterator<Item = &C> {
        self.cells.iter().map(|cell| &cell.column)
    }

    /// Returns the column whose label is horizontally closest to `x`.
    #[must_use]
    pub fn nearest(&self, x: f64) -> &C {
        let xs: Vec<f64> = self.cells.iter().map(|cell| cell.x).collect();
        let index = nearest_index(&xs, x).unwrap_or(0);
        &self.cells[index].column
    }

    /// Maps each token of a line to its nearest column.
    ///
    /// Tokens are visited left to right, so if two tokens land in the same
    /// column the rightmost one wins regardless of input order.
    #[must_use]
    pub fn map_line(&self, tokens: &[Token]) -> BTreeMap<C, String> {
        let mut ordered: Vec<&Token> = tokens.iter().collect();
        ordered.sort_by(|a, b| a.x.total_cmp(&b.x));

        let mut out = BTreeMap::new();
        for token in ordered {
            out.insert(self.nearest(token.x).clone(), token.text.clone());
        }
        out
    }
}

/// Index of the value in `xs` closest to `x`, preferring the lowest index
/// on ties. Returns `None` for an empty slice.
#[must_use]
pub fn nearest_index(xs: &[f64], x: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &candidate) in xs.iter().enumerate() {
        let distance = (candidate - x).abs();
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}
