//! Page-scoped flow state and the resume point that survives a page break

use crate::{Margins, Point, Rect};
use serde::{Deserialize, Serialize};
use text_engine::{FontId, PageFonts};

/// Where a suspended block continues
///
/// `item` is the first inline item (or table row) not yet finished and
/// `offset` the byte offset already consumed from it. `partial` is set once
/// the run at `item` has started drawing, so its tab advance and the
/// first-line indent are not applied again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResumePoint {
    pub block: usize,
    pub item: usize,
    pub offset: usize,
    pub partial: bool,
}

impl ResumePoint {
    /// The start of a block
    pub fn start_of(block: usize) -> Self {
        Self {
            block,
            ..Self::default()
        }
    }

    /// The start of an item within a block
    pub fn at_item(block: usize, item: usize) -> Self {
        Self {
            block,
            item,
            ..Self::default()
        }
    }

    pub fn is_block_start(&self) -> bool {
        self.item == 0 && self.offset == 0 && !self.partial
    }
}

/// The line currently being filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineState {
    /// Where the line's content starts (after indent and alignment)
    pub start_x: f32,
    /// Right limit for content
    pub right: f32,
    /// Top of the line box
    pub top: f32,
    /// Tallest size plus annotation on the line
    pub extent: f32,
    /// Line pitch
    pub vsp: f32,
    /// Anything drawn on the line yet
    pub has_content: bool,
}

impl LineState {
    /// Baseline of the line's text
    pub fn baseline(&self) -> f32 {
        self.top + self.extent
    }
}

/// Mutable state of one flow area (body, header, footer or table cell)
///
/// Only the body's resume point outlives its page; header, footer and cell
/// states are discarded once their content is placed.
#[derive(Debug, Clone)]
pub struct FlowState {
    pub cursor: Point,
    /// Area content flows into
    pub area: Rect,
    pub margins: Margins,
    /// Fonts drawn with in this area, flushed when the page closes
    pub page_fonts: PageFonts,
    /// The open line, if any
    pub line: Option<LineState>,
    /// Where the current block continues; `None` when it completed
    pub resume: Option<ResumePoint>,
    placed: bool,
}

impl FlowState {
    pub fn new(area: Rect, margins: Margins) -> Self {
        Self {
            cursor: area.origin(),
            area,
            margins,
            page_fonts: PageFonts::new(),
            line: None,
            resume: None,
            placed: false,
        }
    }

    /// An area without a bottom; content placed in it never suspends
    pub fn unbounded(x: f32, y: f32, width: f32) -> Self {
        Self::new(Rect::new(x, y, width, f32::INFINITY), Margins::uniform(0.0))
    }

    /// Nothing has been placed in the area yet
    pub fn is_fresh(&self) -> bool {
        !self.placed
    }

    pub fn mark_placed(&mut self) {
        self.placed = true;
    }

    /// Vertical space left below the cursor
    pub fn remaining_height(&self) -> f32 {
        self.area.bottom() - self.cursor.y
    }

    /// Whether a block of `height` can be placed now; a fresh area accepts anything
    pub fn fits(&self, height: f32) -> bool {
        self.is_fresh() || height <= self.remaining_height()
    }

    pub fn use_font(&mut self, font: FontId) {
        self.page_fonts.insert(font);
    }

    /// Take the fonts used so far
    pub fn flush_fonts(&mut self) -> Vec<FontId> {
        self.page_fonts.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_point_block_start() {
        assert!(ResumePoint::start_of(3).is_block_start());
        assert!(!ResumePoint::at_item(3, 1).is_block_start());
        let partial = ResumePoint {
            partial: true,
            ..ResumePoint::start_of(0)
        };
        assert!(!partial.is_block_start());
    }

    #[test]
    fn test_fresh_area_accepts_anything() {
        let mut state = FlowState::new(Rect::new(0.0, 0.0, 100.0, 50.0), Margins::default());
        assert!(state.fits(80.0));
        state.mark_placed();
        assert!(!state.fits(80.0));
        assert!(state.fits(50.0));
    }

    #[test]
    fn test_unbounded_area_never_refuses() {
        let mut state = FlowState::unbounded(10.0, 20.0, 100.0);
        assert_eq!(state.cursor, Point::new(10.0, 20.0));
        state.mark_placed();
        state.cursor.y = 5000.0;
        assert!(state.remaining_height().is_infinite());
        assert!(state.fits(1.0e6));
    }
}
