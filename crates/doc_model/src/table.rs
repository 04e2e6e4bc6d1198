//! Table structures
//!
//! Tables are a thin container: each cell holds ordinary paragraphs that the
//! layout engine flows with the same text machinery as body paragraphs.

use crate::{Paragraph, Result};
use serde::{Deserialize, Serialize};

/// A table cell containing paragraphs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
    /// Inner padding on every side, in points
    #[serde(default)]
    pub padding: f32,
}

impl TableCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.paragraphs.push(paragraph);
        self
    }
}

/// A row of cells; rows are never split across pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    /// Minimum row height in points
    #[serde(default)]
    pub min_height: f32,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            min_height: 0.0,
        }
    }
}

/// A table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column widths in points; missing or zero widths share the remaining space
    pub column_widths: Vec<f32>,
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn new(column_widths: Vec<f32>) -> Self {
        Self {
            column_widths,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: TableRow) -> &mut Self {
        self.rows.push(row);
        self
    }

    /// Number of columns, taken from the widest row or the declared grid
    pub fn column_count(&self) -> usize {
        let widest = self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        widest.max(self.column_widths.len())
    }

    /// Resolve column widths against the available width.
    ///
    /// Declared positive widths are kept; the remaining space is shared evenly
    /// by the undeclared columns.
    pub fn resolve_widths(&self, available: f32) -> Vec<f32> {
        let count = self.column_count();
        if count == 0 {
            return Vec::new();
        }

        let declared: Vec<Option<f32>> = (0..count)
            .map(|i| self.column_widths.get(i).copied().filter(|w| *w > 0.0))
            .collect();
        let fixed: f32 = declared.iter().flatten().sum();
        let open = declared.iter().filter(|w| w.is_none()).count();
        let share = if open > 0 {
            ((available - fixed) / open as f32).max(0.0)
        } else {
            0.0
        };

        declared.into_iter().map(|w| w.unwrap_or(share)).collect()
    }

    /// Validate every paragraph in every cell
    pub fn validate(&self) -> Result<()> {
        for row in &self.rows {
            for cell in &row.cells {
                for para in &cell.paragraphs {
                    para.validate()?;
                }
            }
        }
        Ok(())
    }
}
