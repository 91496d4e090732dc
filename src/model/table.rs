//! Table types.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A table structure.
///
/// Every row holds exactly one cell per entry in `col_widths`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Column widths in pixels
    pub col_widths: Vec<f32>,
}

impl Table {
    /// Create an empty `rows` x `cols` table spanning `width` pixels.
    pub fn new(rows: usize, cols: usize, width: f32, row_height: f32) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidElement(format!(
                "table needs at least one row and column, got {}x{}",
                rows, cols
            )));
        }
        let col_width = width / cols as f32;
        Ok(Self {
            rows: (0..rows).map(|_| TableRow::empty(cols, row_height)).collect(),
            col_widths: vec![col_width; cols],
        })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.col_widths.len()
    }

    /// Declared width: the sum of the column widths.
    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    /// Declared height: the sum of the row heights.
    pub fn height(&self) -> f32 {
        self.rows.iter().map(|r| r.height).sum()
    }

    /// Get a cell.
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.cells.get(col))
    }

    /// Replace the text of a cell.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) -> Result<()> {
        let cols = self.column_count();
        let rows = self.row_count();
        let cell = self
            .rows
            .get_mut(row)
            .ok_or(Error::OutOfRange {
                position: row,
                len: rows,
            })?
            .cells
            .get_mut(col)
            .ok_or(Error::OutOfRange {
                position: col,
                len: cols,
            })?;
        cell.value = value.into();
        Ok(())
    }

    /// Insert an empty row before `at` (`at == row_count` appends).
    ///
    /// The new row copies the height of its neighbour.
    pub fn insert_row(&mut self, at: usize) -> Result<()> {
        if at > self.row_count() {
            return Err(Error::OutOfRange {
                position: at,
                len: self.row_count(),
            });
        }
        let height = self
            .rows
            .get(at)
            .or_else(|| self.rows.last())
            .map(|r| r.height)
            .unwrap_or_default();
        let row = TableRow::empty(self.column_count(), height);
        self.rows.insert(at, row);
        Ok(())
    }

    /// Delete a row. The last remaining row cannot be deleted.
    pub fn delete_row(&mut self, row: usize) -> Result<()> {
        if row >= self.row_count() {
            return Err(Error::OutOfRange {
                position: row,
                len: self.row_count(),
            });
        }
        if self.row_count() == 1 {
            return Err(Error::InvalidElement(
                "cannot delete the only table row".to_string(),
            ));
        }
        self.rows.remove(row);
        Ok(())
    }

    /// Insert an empty column before `at`, splitting the neighbour's width.
    pub fn insert_col(&mut self, at: usize) -> Result<()> {
        let cols = self.column_count();
        if at > cols {
            return Err(Error::OutOfRange {
                position: at,
                len: cols,
            });
        }
        // The table keeps its overall width.
        let half = match self.col_widths.get_mut(at.min(cols.saturating_sub(1))) {
            Some(width) => {
                *width /= 2.0;
                *width
            }
            None => 0.0,
        };
        self.col_widths.insert(at, half);
        for row in &mut self.rows {
            let at = at.min(row.cells.len());
            row.cells.insert(at, TableCell::default());
        }
        Ok(())
    }

    /// Delete a column. The last remaining column cannot be deleted.
    pub fn delete_col(&mut self, col: usize) -> Result<()> {
        let cols = self.column_count();
        if col >= cols {
            return Err(Error::OutOfRange {
                position: col,
                len: cols,
            });
        }
        if cols == 1 {
            return Err(Error::InvalidElement(
                "cannot delete the only table column".to_string(),
            ));
        }
        let width = self.col_widths.remove(col);
        let neighbour = col.min(cols - 2);
        self.col_widths[neighbour] += width;
        for row in self.rows.iter_mut().filter(|r| col < r.cells.len()) {
            row.cells.remove(col);
        }
        Ok(())
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Row height in pixels
    pub height: f32,
}

impl TableRow {
    /// Create a row of empty cells.
    pub fn empty(cols: usize, height: f32) -> Self {
        Self {
            cells: vec![TableCell::default(); cols],
            height,
        }
    }

    /// Get plain text of the row (tab-separated).
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.value.as_str())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell text
    #[serde(default)]
    pub value: String,
}

impl TableCell {
    /// Create a cell with text.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}
