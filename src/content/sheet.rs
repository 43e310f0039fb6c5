//! Spreadsheet codec — newline-delimited rows of comma-delimited cells.
//!
//! The display grid is padded to a minimum of 50 rows by 20 columns, but the
//! padding is virtual: persisted content only grows when a cell inside the
//! padded region is actually edited, and persisted row/column counts never
//! shrink across edits.

/// Minimum number of rows the display grid shows.
pub const MIN_DISPLAY_ROWS: usize = 50;

/// Minimum number of columns the display grid shows.
pub const MIN_DISPLAY_COLS: usize = 20;

/// A parsed spreadsheet grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetGrid {
    rows: Vec<Vec<String>>,
}

impl SheetGrid {
    /// Parse sheet content. Never fails: any text is a grid.
    pub fn parse(content: &str) -> Self {
        let rows = if content.is_empty() {
            Vec::new()
        } else {
            content
                .split('\n')
                .map(|row| row.split(',').map(str::to_string).collect())
                .collect()
        };
        Self { rows }
    }

    /// Number of persisted rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of persisted columns (widest row).
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Rows the display grid shows, padding included.
    pub fn display_rows(&self) -> usize {
        self.row_count().max(MIN_DISPLAY_ROWS)
    }

    /// Columns the display grid shows, padding included.
    pub fn display_cols(&self) -> usize {
        self.col_count().max(MIN_DISPLAY_COLS)
    }

    /// Cell value at `(row, col)`; padded cells read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Set the cell at `(row, col)`, growing the persisted grid to include
    /// it when the edit lands in the padded region.
    ///
    /// Growth pads intermediate rows/cells with empty strings; existing
    /// content is never truncated, so persisted dimensions are
    /// non-decreasing.
    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) {
        while self.rows.len() <= row {
            self.rows.push(Vec::new());
        }
        let target = &mut self.rows[row];
        while target.len() <= col {
            target.push(String::new());
        }
        target[col] = value.into();
    }

    /// Serialize back into file content.
    pub fn serialize(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join(","))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
