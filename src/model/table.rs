//! Tables and their cells.

use crate::model::link::Link;
use crate::model::position::{Position, Positioned};
use crate::model::textbox::HorizontalBox;

/// A table detected on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// 1-based number of the table within its scope (root or chapter)
    pub idx: usize,
    /// Location of the table
    pub position: Position,
    /// The cells of the table; every `(row, col)` pair is unique
    pub cells: Vec<Cell>,
    /// Caption text near the table, when known
    pub caption: Option<String>,
    /// Slash-joined identifier chain; assigned during assembly
    pub uid: String,
}

/// A single table cell.
///
/// Merged regions are represented by the surviving cell only; `row` and
/// `col` are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// 1-based row number
    pub row: u32,
    /// 1-based column number
    pub col: u32,
    /// Location of the cell
    pub position: Position,
    /// Text content of the cell, if any
    pub textbox: Option<HorizontalBox>,
    /// Links covering character ranges of the cell text
    pub links: Vec<Link>,
}

impl Table {
    /// Create a new table.
    pub fn new(idx: usize, position: Position, cells: Vec<Cell>) -> Self {
        Self {
            idx,
            position,
            cells,
            caption: None,
            uid: String::new(),
        }
    }

    /// Identifier addressing the table: `table.<idx>`.
    pub fn id(&self) -> String {
        format!("table.{}", self.idx)
    }

    /// The cells grouped by row, each row sorted by column.
    pub fn rows(&self) -> Vec<Vec<&Cell>> {
        let max_row = self.cells.iter().map(|c| c.row).max().unwrap_or(0);
        (1..=max_row)
            .map(|r| {
                let mut row: Vec<&Cell> = self.cells.iter().filter(|c| c.row == r).collect();
                row.sort_by_key(|c| c.col);
                row
            })
            .collect()
    }

    /// The cells grouped by column, each column sorted by row.
    pub fn columns(&self) -> Vec<Vec<&Cell>> {
        let max_col = self.cells.iter().map(|c| c.col).max().unwrap_or(0);
        (1..=max_col)
            .map(|col| {
                let mut column: Vec<&Cell> = self.cells.iter().filter(|c| c.col == col).collect();
                column.sort_by_key(|c| c.row);
                column
            })
            .collect()
    }

    /// Number of rows.
    pub fn rows_count(&self) -> usize {
        self.rows().len()
    }

    /// Number of columns.
    pub fn columns_count(&self) -> usize {
        self.columns().len()
    }
}

impl Cell {
    /// Flat text of the cell; empty when the cell has no textbox.
    pub fn text(&self) -> String {
        self.textbox.as_ref().map(|t| t.text()).unwrap_or_default()
    }
}

impl Positioned for Table {
    fn position(&self) -> &Position {
        &self.position
    }
}
