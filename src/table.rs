//! Aligned text tables
//!
//! Cells are formatted up front so column widths cover the whole dataset
//! (header included) before the first line is written.
//!
//! ```text
//! |  name | size |
//! | adder |   10 |
//! |   bar |   20 |
//! ```

use std::fmt;
use std::io::{self, Write};

use crate::log::Entry;
use crate::value::format_cell;

/// A fully formatted table ready for printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    widths: Vec<usize>,
    lines: Vec<Vec<String>>,
}

impl Table {
    /// Format `entries` under `columns`.
    ///
    /// A column missing from an entry renders as an empty cell.
    #[must_use]
    pub fn new<S: AsRef<str>>(columns: &[S], entries: &[Entry]) -> Self {
        let header: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
        let mut lines = Vec::with_capacity(entries.len() + 1);
        lines.push(header);

        for entry in entries {
            let cells: Vec<String> = columns
                .iter()
                .map(|c| entry.get(c.as_ref()).map(format_cell).unwrap_or_default())
                .collect();
            for (width, cell) in widths.iter_mut().zip(&cells) {
                *width = (*width).max(cell.chars().count());
            }
            lines.push(cells);
        }

        Self { widths, lines }
    }

    /// Display width of each column.
    #[must_use]
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Number of data rows (header excluded).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.lines.len() - 1
    }

    /// Write the header and every row to `out`.
    ///
    /// # Errors
    ///
    /// Propagates write failures from `out`.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str("|")?;
            for (cell, width) in line.iter().zip(&self.widths) {
                write!(f, " {cell:>width$} |")?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Render `entries` under `columns` into a string.
#[must_use]
pub fn render<S: AsRef<str>>(columns: &[S], entries: &[Entry]) -> String {
    Table::new(columns, entries).to_string()
}
