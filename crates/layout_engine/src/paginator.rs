//! Pagination
//!
//! The paginator drives one page at a time: it opens the page on the sink,
//! lays out the header, pulls body blocks through the paragraph and table
//! flows until one suspends or the document ends, lays out the footer and
//! closes the page with the fonts it used. A suspended block's resume point
//! seeds the next page's flow state.

use crate::flow::{FlowOutcome, LayoutContext, ParagraphFlow};
use crate::table_flow::TableFlow;
use crate::{ContentWriter, FlowState, LayoutError, LayoutSettings, Margins, PageSink, Rect, Result, ResumePoint};
use doc_model::{Block, Document, Paragraph};
use serde::{Deserialize, Serialize};
use text_engine::{FontRegistry, PageFonts};

/// What one pagination run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSummary {
    pub pages: usize,
    /// Body blocks completed
    pub blocks: usize,
    /// Page breaks taken inside a block
    pub suspensions: usize,
    /// Units placed past the width limit because nothing else fit
    pub forced_placements: usize,
}

/// Paginator that flows a document onto pages
#[derive(Debug)]
pub struct Paginator {
    settings: LayoutSettings,
    registry: FontRegistry,
}

impl Paginator {
    pub fn new(settings: LayoutSettings, registry: FontRegistry) -> Self {
        Self { settings, registry }
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Fonts resolved so far; the registry outlives a single document
    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }

    pub fn into_registry(self) -> FontRegistry {
        self.registry
    }

    /// Lay the whole document out, writing every page to `out`.
    ///
    /// Every opened page is closed exactly once, also when a structural error
    /// stops layout; an empty document produces one empty page.
    pub fn paginate<O>(&mut self, doc: &Document, out: &mut O) -> Result<PaginationSummary>
    where
        O: ContentWriter + PageSink,
    {
        let page = self.settings.page.clone();
        page.validate()?;
        let geometry = page.geometry();

        let mut summary = PaginationSummary::default();
        let mut next_block = 0;
        let mut resume: Option<ResumePoint> = None;

        loop {
            let page_index = summary.pages;
            if page_index >= self.settings.max_pages {
                return Err(LayoutError::InvalidPageSetup(format!(
                    "document needs more than {} pages",
                    self.settings.max_pages
                )));
            }

            let handle = out.open_page(&geometry);
            summary.pages += 1;
            tracing::debug!(page = page_index, "page opened");

            let mut fonts = PageFonts::new();
            let mut state = FlowState::new(geometry.body(), geometry.margins);
            state.resume = resume.take();

            let header = page.header_area(page_index);
            let body = match self.margin_flow(&doc.header, header, "header", out, &mut fonts, &mut summary) {
                Ok(()) => self.fill_page(doc, &mut next_block, &mut state, out, &mut summary),
                Err(err) => Err(err),
            };
            let footer = match &body {
                Ok(_) => self.margin_flow(&doc.footer, page.footer_area(page_index), "footer", out, &mut fonts, &mut summary),
                Err(_) => Ok(()),
            };

            for font in state.flush_fonts() {
                fonts.insert(font);
            }
            let used = fonts.flush();
            out.close_page(handle, &used);
            tracing::debug!(page = page_index, fonts = used.len(), "page closed");

            resume = body?;
            footer?;
            if next_block >= doc.body.len() {
                break;
            }
        }

        Ok(summary)
    }

    /// Flow body blocks into the page until one suspends or the page is full.
    /// Returns the resume point for the next page.
    fn fill_page<O: ContentWriter>(
        &mut self,
        doc: &Document,
        next_block: &mut usize,
        state: &mut FlowState,
        out: &mut O,
        summary: &mut PaginationSummary,
    ) -> Result<Option<ResumePoint>> {
        while let Some(block) = doc.body.get(*next_block) {
            match self.flow_block(block, *next_block, state, out, summary)? {
                FlowOutcome::Completed => {
                    *next_block += 1;
                    summary.blocks += 1;
                }
                FlowOutcome::Suspended(resume) => {
                    summary.suspensions += 1;
                    return Ok(Some(resume));
                }
            }

            if !state.is_fresh() && state.remaining_height() < self.settings.default_baseline {
                break;
            }
        }
        Ok(None)
    }

    fn flow_block<O: ContentWriter>(
        &mut self,
        block: &Block,
        index: usize,
        state: &mut FlowState,
        out: &mut O,
        summary: &mut PaginationSummary,
    ) -> Result<FlowOutcome> {
        let mut ctx = LayoutContext::new(&mut self.registry, &mut *out, self.settings.default_baseline);
        let outcome = match block {
            Block::Paragraph(paragraph) => ParagraphFlow::new(paragraph, index).run(&mut ctx, state),
            Block::Table(table) => TableFlow::new(table, index).run(&mut ctx, state),
        };
        summary.forced_placements += ctx.forced_placements;
        outcome
    }

    /// Lay out header or footer paragraphs; content that does not fit is dropped
    fn margin_flow<O: ContentWriter>(
        &mut self,
        paragraphs: &[Paragraph],
        area: Option<Rect>,
        name: &'static str,
        out: &mut O,
        fonts: &mut PageFonts,
        summary: &mut PaginationSummary,
    ) -> Result<()> {
        let Some(area) = area else {
            return Ok(());
        };
        if paragraphs.is_empty() {
            return Ok(());
        }

        let mut state = FlowState::new(area, Margins::uniform(0.0));
        let mut ctx = LayoutContext::new(&mut self.registry, &mut *out, self.settings.default_baseline);
        for (index, paragraph) in paragraphs.iter().enumerate() {
            if let FlowOutcome::Suspended(resume) = ParagraphFlow::new(paragraph, index).run(&mut ctx, &mut state)? {
                tracing::warn!(area = name, paragraph = index, item = resume.item, "content overflows its area, truncated");
                break;
            }
        }
        summary.forced_placements += ctx.forced_placements;

        for font in state.flush_fonts() {
            fonts.insert(font);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PageConfig, PageGeometry, PageHandle, Point, TextDraw};
    use doc_model::{FontPair, ImageRef, InlineItem, Run, ShapeHandle};
    use text_engine::{FontId, FontKind, FontMetrics, StaticFontSource};

    /// Records which page every text draw landed on
    #[derive(Default)]
    struct Pages {
        opened: Vec<PageGeometry>,
        closed: Vec<(PageHandle, Vec<FontId>)>,
        texts: Vec<(usize, Point)>,
    }

    impl ContentWriter for Pages {
        fn draw_text(&mut self, text: &TextDraw<'_>) {
            self.texts.push((self.opened.len() - 1, text.origin));
        }
        fn draw_shape(&mut self, _: &ShapeHandle, _: Point, _: f32, _: f32) {}
        fn draw_image(&mut self, _: &ImageRef, _: Point, _: f32, _: f32) {}
        fn draw_chart(&mut self, _: &serde_json::Value, _: Point, _: f32, _: f32) {}
    }

    impl PageSink for Pages {
        fn open_page(&mut self, geometry: &PageGeometry) -> PageHandle {
            self.opened.push(*geometry);
            PageHandle(self.opened.len() - 1)
        }

        fn close_page(&mut self, page: PageHandle, fonts: &[FontId]) {
            self.closed.push((page, fonts.to_vec()));
        }
    }

    /// 200x200 page, 40pt margins, header from 10pt: a 120x120 body holding
    /// twelve 10pt lines of 24 characters
    fn settings() -> LayoutSettings {
        let mut page = PageConfig::custom(200.0, 200.0).with_margins(Margins::uniform(40.0));
        page.header_footer.header_margin = 10.0;
        page.header_footer.footer_height = 20.0;
        LayoutSettings::default().with_page(page).with_default_baseline(10.0)
    }

    fn paginator(settings: LayoutSettings) -> Paginator {
        let metrics = FontMetrics::monospace("Mono", FontKind::Simple, 500);
        Paginator::new(settings, FontRegistry::new(StaticFontSource::new().with_font(metrics)))
    }

    fn para(text: &str) -> Paragraph {
        Paragraph::new().with_run(Run::utf16(text, FontPair::single("Mono"), 10.0))
    }

    fn doc(paragraphs: usize) -> Document {
        let mut doc = Document::new();
        for _ in 0..paragraphs {
            doc.push(para("ab"));
        }
        doc
    }

    #[test]
    fn test_empty_document_has_one_page() {
        let mut out = Pages::default();
        let summary = paginator(settings()).paginate(&Document::new(), &mut out).unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(out.opened.len(), 1);
        assert_eq!(out.closed, vec![(PageHandle(0), Vec::new())]);
    }

    #[test]
    fn test_blocks_flow_onto_following_pages() {
        let mut out = Pages::default();
        let summary = paginator(settings()).paginate(&doc(30), &mut out).unwrap();

        assert_eq!(summary.pages, 3);
        assert_eq!(summary.blocks, 30);
        assert_eq!(summary.suspensions, 0);
        let per_page: Vec<usize> = (0..3).map(|p| out.texts.iter().filter(|(page, _)| *page == p).count()).collect();
        assert_eq!(per_page, vec![12, 12, 6]);
        assert_eq!(out.closed.len(), 3);
        assert!(out.closed.iter().all(|(_, fonts)| fonts.len() == 1));
        // first line of every page sits at the top of the body
        assert_eq!(out.texts[12], (1, Point::new(40.0, 50.0)));
    }

    #[test]
    fn test_paragraph_resumes_on_next_page() {
        let mut doc = Document::new();
        doc.push(para(&"a\n".repeat(20)));
        let mut out = Pages::default();
        let summary = paginator(settings()).paginate(&doc, &mut out).unwrap();

        assert_eq!(summary.pages, 2);
        assert_eq!(summary.suspensions, 1);
        assert_eq!(summary.blocks, 1);
        assert_eq!(out.texts.len(), 20);
        assert_eq!(out.texts.iter().filter(|(page, _)| *page == 1).count(), 8);
        assert_eq!(out.texts[12].1, Point::new(40.0, 50.0));
    }

    #[test]
    fn test_header_and_footer_on_every_page() {
        let mut doc = doc(20);
        doc.header.push(para("head"));
        doc.footer.push(para("foot"));
        let mut out = Pages::default();
        paginator(settings()).paginate(&doc, &mut out).unwrap();

        let header: Vec<&(usize, Point)> = out.texts.iter().filter(|(_, o)| o.y < 40.0).collect();
        let footer: Vec<&(usize, Point)> = out.texts.iter().filter(|(_, o)| o.y > 160.0).collect();
        assert_eq!(header, vec![&(0, Point::new(40.0, 20.0)), &(1, Point::new(40.0, 20.0))]);
        assert_eq!(footer, vec![&(0, Point::new(40.0, 170.0)), &(1, Point::new(40.0, 170.0))]);
    }

    #[test]
    fn test_first_page_header_can_be_suppressed() {
        let mut settings = settings();
        settings.page.header_footer.header_on_first_page = false;
        let mut doc = doc(20);
        doc.header.push(para("head"));
        let mut out = Pages::default();
        paginator(settings).paginate(&doc, &mut out).unwrap();

        let header: Vec<usize> = out.texts.iter().filter(|(_, o)| o.y < 40.0).map(|(p, _)| *p).collect();
        assert_eq!(header, vec![1]);
    }

    #[test]
    fn test_header_overflow_is_truncated() {
        let mut doc = Document::new();
        for _ in 0..4 {
            doc.header.push(para("h"));
        }
        let mut out = Pages::default();
        paginator(settings()).paginate(&doc, &mut out).unwrap();

        // the header area holds three lines
        let ys: Vec<f32> = out.texts.iter().map(|(_, o)| o.y).collect();
        assert_eq!(ys, vec![20.0, 30.0, 40.0]);
        assert_eq!(out.closed.len(), 1);
    }

    #[test]
    fn test_structural_error_still_closes_page() {
        let mut doc = doc(2);
        let mut broken = para("x");
        broken.items.push(InlineItem::Chart(0));
        doc.push(broken);
        let mut out = Pages::default();

        let result = paginator(settings()).paginate(&doc, &mut out);
        assert!(matches!(result, Err(LayoutError::Structural { paragraph: 2, item: 1, .. })));
        assert_eq!(out.opened.len(), 1);
        assert_eq!(out.closed.len(), 1);
        assert_eq!(out.texts.len(), 2);
    }

    #[test]
    fn test_page_limit() {
        let mut settings = settings();
        settings.max_pages = 1;
        let mut out = Pages::default();

        let result = paginator(settings).paginate(&doc(30), &mut out);
        assert!(matches!(result, Err(LayoutError::InvalidPageSetup(_))));
        assert_eq!(out.closed.len(), 1);
    }

    #[test]
    fn test_invalid_page_rejected_before_any_page() {
        let settings = LayoutSettings::default()
            .with_page(PageConfig::custom(100.0, 100.0).with_margins(Margins::uniform(60.0)));
        let mut out = Pages::default();

        let result = paginator(settings).paginate(&doc(1), &mut out);
        assert!(matches!(result, Err(LayoutError::InvalidPageSetup(_))));
        assert!(out.opened.is_empty());
    }

    #[test]
    fn test_registry_is_reused_across_documents() {
        let mut paginator = paginator(settings());
        let mut out = Pages::default();
        paginator.paginate(&doc(1), &mut out).unwrap();
        paginator.paginate(&doc(1), &mut out).unwrap();
        assert_eq!(paginator.registry().len(), 1);
        assert_eq!(out.closed[0].1, out.closed[1].1);
    }
}
