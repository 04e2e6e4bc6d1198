//! Table flow
//!
//! Rows are placed whole. Each row is first laid out into a [`NullWriter`] to
//! learn its height (the tallest cell), then drawn if it fits in the
//! remaining body height. A row that does not fit suspends the table at that
//! row; a row taller than an empty page is placed anyway.

use crate::flow::{close_line, FlowOutcome, LayoutContext, ParagraphFlow};
use crate::{FlowState, NullWriter, Result, ResumePoint};
use doc_model::{Table, TableCell, TableRow};

/// Lays out one table into a [`FlowState`]
#[derive(Debug)]
pub struct TableFlow<'t> {
    table: &'t Table,
    block: usize,
}

impl<'t> TableFlow<'t> {
    pub fn new(table: &'t Table, block: usize) -> Self {
        Self { table, block }
    }

    pub fn run(&self, ctx: &mut LayoutContext<'_>, state: &mut FlowState) -> Result<FlowOutcome> {
        close_line(state);
        let first_row = match state.resume {
            Some(resume) if resume.block == self.block => resume.item,
            _ => 0,
        };
        let widths = self.table.resolve_widths(state.area.width);

        for (index, row) in self.table.rows.iter().enumerate().skip(first_row) {
            let height = self.measure_row(ctx, row, &widths, state.area.x)?;
            if !state.fits(height) {
                let resume = ResumePoint::at_item(self.block, index);
                tracing::debug!(block = self.block, row = index, height, "table suspended");
                state.resume = Some(resume);
                return Ok(FlowOutcome::Suspended(resume));
            }

            self.draw_row(ctx, state, row, &widths)?;
            state.cursor.y += height;
            state.mark_placed();
        }

        state.cursor.x = state.area.x;
        state.resume = None;
        Ok(FlowOutcome::Completed)
    }

    /// Height of a row: its tallest cell, padding included, or its minimum height
    fn measure_row(&self, ctx: &mut LayoutContext<'_>, row: &TableRow, widths: &[f32], left: f32) -> Result<f32> {
        let mut null = NullWriter;
        let mut measure = LayoutContext::new(&mut *ctx.registry, &mut null, ctx.default_baseline);

        let mut height = row.min_height;
        let mut x = left;
        for (cell, width) in row.cells.iter().zip(widths) {
            let mut cell_state = cell_state(cell, x, 0.0, *width);
            self.flow_cell(&mut measure, &mut cell_state, cell)?;
            height = height.max(cell_state.cursor.y + cell.padding);
            x += width;
        }
        Ok(height)
    }

    fn draw_row(&self, ctx: &mut LayoutContext<'_>, state: &mut FlowState, row: &TableRow, widths: &[f32]) -> Result<()> {
        let mut x = state.area.x;
        for (cell, width) in row.cells.iter().zip(widths) {
            let mut cell_state = cell_state(cell, x, state.cursor.y, *width);
            self.flow_cell(ctx, &mut cell_state, cell)?;
            for font in cell_state.flush_fonts() {
                state.use_font(font);
            }
            x += width;
        }
        Ok(())
    }

    fn flow_cell(&self, ctx: &mut LayoutContext<'_>, state: &mut FlowState, cell: &TableCell) -> Result<()> {
        // cell areas have no bottom, so every paragraph completes
        for paragraph in &cell.paragraphs {
            ParagraphFlow::new(paragraph, self.block).run(ctx, state)?;
        }
        Ok(())
    }
}

fn cell_state(cell: &TableCell, x: f32, y: f32, width: f32) -> FlowState {
    let inner = (width - 2.0 * cell.padding).max(0.0);
    FlowState::unbounded(x + cell.padding, y + cell.padding, inner)
}
