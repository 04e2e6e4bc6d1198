//! Paragraph flow controller
//!
//! Drives the line breaker and the run emitter over one paragraph's inline
//! items, opening lines through the pre-scanner and placing inline objects in
//! their own vertical slot. When the flow area runs out the paragraph is
//! suspended: the exact position is recorded as a [`ResumePoint`] in the
//! [`FlowState`] and a later call with a fresh state continues from it.

use crate::emitter::{emit, emit_annotation, emit_marker, FragmentText, SpacingMode};
use crate::fonts::RunFonts;
use crate::prescan::{line_pitch, scan_line, LineFrame, ScanStart};
use crate::{
    BreakOptions, ContentWriter, FlowState, LayoutError, LineBreaker, LineState, Point, Result, ResumePoint,
};
use doc_model::{Alignment, InlineItem, Paragraph, Run, TextEncoding};
use text_engine::{em_to_points, points_to_em, segments, tracking_em, CharCodec, FontRegistry, LegacyDbcs, Utf16Be};

/// Shared services for laying out one document
pub struct LayoutContext<'a> {
    pub registry: &'a mut FontRegistry,
    pub writer: &'a mut dyn ContentWriter,
    /// Line pitch unit for paragraphs that declare none
    pub default_baseline: f32,
    /// Units placed past the width limit because nothing else fit
    pub forced_placements: usize,
}

impl<'a> LayoutContext<'a> {
    pub fn new(registry: &'a mut FontRegistry, writer: &'a mut dyn ContentWriter, default_baseline: f32) -> Self {
        Self {
            registry,
            writer,
            default_baseline,
            forced_placements: 0,
        }
    }
}

/// Where a paragraph flow is in its life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    InParagraph,
    Suspended,
    Completed,
}

/// Result of one flow call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    /// Out of room; continue from the resume point on a fresh area
    Suspended(ResumePoint),
}

/// Position inside the paragraph during one call
#[derive(Debug, Clone, Copy)]
struct Position {
    item: usize,
    offset: usize,
    partial: bool,
    first_line: bool,
}

enum Step {
    Continue,
    Suspend(ResumePoint),
}

/// Lays out one paragraph into a [`FlowState`]
#[derive(Debug)]
pub struct ParagraphFlow<'p> {
    paragraph: &'p Paragraph,
    block: usize,
    stop_before: Option<usize>,
    phase: FlowPhase,
}

impl<'p> ParagraphFlow<'p> {
    pub fn new(paragraph: &'p Paragraph, block: usize) -> Self {
        Self {
            paragraph,
            block,
            stop_before: None,
            phase: FlowPhase::Idle,
        }
    }

    /// Suspend before item `item` once the flow reaches it. The open line is
    /// kept in the state so the next call continues it.
    pub fn stop_before(mut self, item: usize) -> Self {
        self.stop_before = Some(item);
        self
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn block(&self) -> usize {
        self.block
    }

    /// Lay the paragraph out, starting at the state's resume point when it
    /// belongs to this block
    pub fn run(&mut self, ctx: &mut LayoutContext<'_>, state: &mut FlowState) -> Result<FlowOutcome> {
        self.validate()?;
        self.phase = FlowPhase::InParagraph;

        let paragraph = self.paragraph;
        let props = &paragraph.properties;
        let entry = match state.resume {
            Some(resume) if resume.block == self.block => resume,
            _ => ResumePoint::start_of(self.block),
        };
        let opening = entry.is_block_start() && state.line.is_none();
        let mut pos = Position {
            item: entry.item,
            offset: entry.offset,
            partial: entry.partial,
            first_line: opening,
        };
        let baseline = if props.baseline > 0.0 {
            props.baseline
        } else {
            ctx.default_baseline
        };

        if opening && !state.is_fresh() {
            state.cursor.y += props.space_before;
        }

        // An empty paragraph still takes one line
        if paragraph.items.is_empty() {
            if let Step::Suspend(resume) = self.open_line(ctx, state, &mut pos, baseline) {
                return Ok(self.suspend(state, resume));
            }
            close_line(state);
        }

        while pos.item < paragraph.items.len() {
            if self.stop_before == Some(pos.item) && pos.item > entry.item {
                let resume = self.resume_at(&pos);
                return Ok(self.suspend(state, resume));
            }

            let step = match paragraph.items[pos.item] {
                InlineItem::TextRun(index) => {
                    let run = paragraph.runs.get(index).ok_or_else(|| self.structural(pos.item))?;
                    match run.encoding {
                        TextEncoding::Legacy => self.flow_run::<LegacyDbcs>(ctx, state, &mut pos, run, baseline),
                        TextEncoding::Utf16 => self.flow_run::<Utf16Be>(ctx, state, &mut pos, run, baseline),
                    }
                }
                InlineItem::Shape(index) => {
                    let shape = paragraph.shapes.get(index).ok_or_else(|| self.structural(pos.item))?;
                    self.place_object(ctx, state, &mut pos, shape.height, |writer, origin| {
                        writer.draw_shape(&shape.handle, origin, shape.width, shape.height)
                    })
                }
                InlineItem::Image(index) => {
                    let image = paragraph.images.get(index).ok_or_else(|| self.structural(pos.item))?;
                    self.place_object(ctx, state, &mut pos, image.height, |writer, origin| {
                        writer.draw_image(image, origin, image.width, image.height)
                    })
                }
                InlineItem::Chart(index) => {
                    let chart = paragraph.charts.get(index).ok_or_else(|| self.structural(pos.item))?;
                    self.place_object(ctx, state, &mut pos, chart.height, |writer, origin| {
                        writer.draw_chart(&chart.spec, origin, chart.width, chart.height)
                    })
                }
            };
            if let Step::Suspend(resume) = step {
                return Ok(self.suspend(state, resume));
            }

            pos.item += 1;
            pos.offset = 0;
            pos.partial = false;

            let more = pos.item < paragraph.items.len();
            if more && state.line.is_none() && !state.is_fresh() && state.remaining_height() < baseline {
                let resume = self.resume_at(&pos);
                return Ok(self.suspend(state, resume));
            }
        }

        close_line(state);
        state.cursor.y += props.space_after;
        state.resume = None;
        self.phase = FlowPhase::Completed;
        Ok(FlowOutcome::Completed)
    }

    fn validate(&self) -> Result<()> {
        self.paragraph.validate().map_err(|err| match err {
            doc_model::DocModelError::InvalidStructure { item, kind, index, count } => {
                tracing::warn!(paragraph = self.block, item, %kind, index, count, "inline item out of range");
                LayoutError::Structural {
                    paragraph: self.block,
                    item,
                    kind,
                    index,
                    count,
                }
            }
            other => LayoutError::DocModel(other),
        })
    }

    fn structural(&self, item: usize) -> LayoutError {
        let entry = self.paragraph.items[item];
        LayoutError::Structural {
            paragraph: self.block,
            item,
            kind: entry.kind(),
            index: entry.index(),
            count: self.paragraph.declared_count(entry.kind()),
        }
    }

    fn resume_at(&self, pos: &Position) -> ResumePoint {
        ResumePoint {
            block: self.block,
            item: pos.item,
            offset: pos.offset,
            partial: pos.partial,
        }
    }

    fn suspend(&mut self, state: &mut FlowState, resume: ResumePoint) -> FlowOutcome {
        tracing::debug!(
            block = resume.block,
            item = resume.item,
            offset = resume.offset,
            partial = resume.partial,
            "paragraph suspended"
        );
        state.resume = Some(resume);
        self.phase = FlowPhase::Suspended;
        FlowOutcome::Suspended(resume)
    }

    fn frame(&self, state: &FlowState, first_line: bool) -> LineFrame {
        let props = &self.paragraph.properties;
        let first = if first_line { props.first_line_indent } else { 0.0 };
        LineFrame {
            available: state.area.width,
            indent: props.indent + first,
            right_indent: props.right_indent,
        }
    }

    /// Pre-scan and open the line that starts at `pos`
    fn open_line(&self, ctx: &mut LayoutContext<'_>, state: &mut FlowState, pos: &mut Position, baseline: f32) -> Step {
        let props = &self.paragraph.properties;
        let frame = self.frame(state, pos.first_line);
        let start = ScanStart {
            item: pos.item,
            offset: pos.offset,
            partial: pos.partial,
            first_line: pos.first_line,
        };
        let scan = scan_line(self.paragraph, start, frame.content_width(), ctx.registry);
        let vsp = line_pitch(scan.extent, baseline);

        if !state.fits(vsp) {
            return Step::Suspend(self.resume_at(pos));
        }

        let start_x = state.area.x + frame.start_offset(props.alignment, scan.width);
        let mut line = LineState {
            start_x,
            right: state.area.right() - props.right_indent,
            top: state.cursor.y,
            extent: scan.extent,
            vsp,
            has_content: false,
        };
        state.cursor.x = start_x;

        if pos.first_line {
            if let Some(marker) = &props.list {
                let fonts = RunFonts::resolve(ctx.registry, &marker.fonts, marker.encoding);
                let origin = Point::new(start_x, line.baseline());
                emit_marker(&mut *ctx.writer, &mut state.page_fonts, marker, &fonts, origin);
                state.cursor.x += scan.marker_advance;
                line.has_content = true;
                state.mark_placed();
            }
            pos.first_line = false;
        }

        state.line = Some(line);
        Step::Continue
    }

    fn flow_run<C: CharCodec>(
        &self,
        ctx: &mut LayoutContext<'_>,
        state: &mut FlowState,
        pos: &mut Position,
        run: &Run,
        baseline: f32,
    ) -> Step {
        let fonts = RunFonts::resolve(ctx.registry, &run.fonts, run.encoding);
        let segments = segments::<C>(&run.text);
        let scale = run.scale();
        let tracking = run.letter_spacing.map_or(0, |spacing| tracking_em(spacing, run.size, scale));
        let justify = self.paragraph.properties.alignment == Alignment::Justify;

        // Every run starts on an open line, so an empty run still takes one
        if state.line.is_none() {
            if let Step::Suspend(resume) = self.open_line(ctx, state, pos, baseline) {
                return Step::Suspend(resume);
            }
        }
        if pos.offset == 0 && !pos.partial {
            if let Some(tab) = run.tab_advance {
                state.cursor.x += tab;
            }
            pos.partial = true;
        }

        while pos.offset < run.text.len() {
            if state.line.is_none() {
                if let Step::Suspend(resume) = self.open_line(ctx, state, pos, baseline) {
                    return Step::Suspend(resume);
                }
            }
            let Some(line) = state.line else {
                break;
            };
            let Some(segment) = segments.iter().find(|s| s.range.contains(&pos.offset)) else {
                break;
            };

            let font = fonts.for_script(segment.script);
            let breaker = LineBreaker::<C>::new(&run.text[..segment.range.end], &*ctx.registry, font);
            let limit = points_to_em(line.right - state.cursor.x, run.size, scale);
            let opts = BreakOptions::new(limit).with_tracking(tracking);

            let mut cursor = pos.offset;
            let mut fragment = breaker.break_line(&mut cursor, &opts);
            if fragment.next == pos.offset {
                if line.has_content {
                    close_line(state);
                    continue;
                }
                fragment = breaker.break_forced(&mut cursor, tracking);
                ctx.forced_placements += 1;
            }

            let origin = Point::new(state.cursor.x, line.baseline());
            if fragment.range.start == 0 && !fragment.is_empty() {
                emit_annotation(&mut *ctx.writer, &mut state.page_fonts, run, &fonts, origin.x, origin.y);
            }

            let slack = (justify && fragment.ending.is_wrap())
                .then(|| line.right - state.cursor.x - em_to_points(fragment.glyph_width, run.size, scale));
            let text = FragmentText {
                bytes: &run.text[fragment.range.clone()],
                font,
                glyph_width: fragment.glyph_width,
                width: fragment.width,
                chars: fragment.chars,
            };
            let advance = emit(
                &mut *ctx.writer,
                &mut state.page_fonts,
                run,
                &text,
                origin,
                SpacingMode::for_run(run, slack),
            );
            state.cursor.x += advance;

            if !fragment.is_empty() {
                if let Some(open) = state.line.as_mut() {
                    open.has_content = true;
                }
                state.mark_placed();
            }
            pos.offset = fragment.next;
            if fragment.ending.ends_line() {
                close_line(state);
            }
        }

        Step::Continue
    }

    /// Place an inline object in its own vertical slot
    fn place_object(
        &self,
        ctx: &mut LayoutContext<'_>,
        state: &mut FlowState,
        pos: &mut Position,
        height: f32,
        draw: impl FnOnce(&mut dyn ContentWriter, Point),
    ) -> Step {
        close_line(state);
        if !state.fits(height) {
            return Step::Suspend(self.resume_at(pos));
        }

        let frame = self.frame(state, pos.first_line);
        let origin = Point::new(state.area.x + frame.indent, state.cursor.y);
        draw(&mut *ctx.writer, origin);

        state.cursor.y += height;
        state.cursor.x = state.area.x;
        state.mark_placed();
        pos.first_line = false;
        Step::Continue
    }
}

/// Close the open line and move the cursor to the start of the next one
pub(crate) fn close_line(state: &mut FlowState) {
    if let Some(line) = state.line.take() {
        state.cursor.y = line.top + line.vsp;
        state.cursor.x = state.area.x;
        state.mark_placed();
    }
}
