//! Recording content writer and page sink
//!
//! [`Recorder`] keeps every drawing call as a [`RenderItem`] on the page that
//! is currently open. It also checks the page protocol: a call with no open
//! page, a second `open_page` before `close_page`, or closing a page twice is
//! noted and reported by [`Recorder::finish`].

use crate::{display_text, GlyphRun, PageRender, Rect, RenderError, RenderItem, RenderModel, Result};
use doc_model::{ImageRef, ShapeHandle};
use layout_engine::{ContentWriter, PageGeometry, PageHandle, PageSink, Point, TextDraw};
use text_engine::FontId;

/// Records pages and drawing calls into a [`RenderModel`]
#[derive(Debug, Default)]
pub struct Recorder {
    model: RenderModel,
    open: Option<usize>,
    closed: Vec<bool>,
    violations: Vec<String>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages recorded so far, including one still open
    pub fn pages(&self) -> &[PageRender] {
        &self.model.pages
    }

    /// Whether a page is open
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Finish recording.
    ///
    /// Fails if a page is still open or the page protocol was broken.
    pub fn finish(self) -> Result<RenderModel> {
        if let Some(index) = self.open {
            return Err(RenderError::UnclosedPage(index));
        }
        if let Some(first) = self.violations.into_iter().next() {
            return Err(RenderError::InvalidLayout(first));
        }
        Ok(self.model)
    }

    /// Consume the recorder without checks, keeping whatever was recorded
    pub fn into_model(self) -> RenderModel {
        self.model
    }

    fn violation(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.violations.push(message);
    }

    fn push(&mut self, item: RenderItem) {
        match self.open {
            Some(index) => self.model.pages[index].items.push(item),
            None => self.violation("drawing call with no open page".to_string()),
        }
    }
}

impl ContentWriter for Recorder {
    fn draw_text(&mut self, text: &TextDraw<'_>) {
        self.push(RenderItem::GlyphRun(GlyphRun {
            text: display_text(text.text, text.encoding),
            bytes: text.text.to_vec(),
            encoding: text.encoding,
            font: text.font,
            font_size: text.size as f64,
            scale_pct: text.scale_pct,
            decorations: text.decorations,
            spacing: text.spacing as f64,
            x: text.origin.x as f64,
            y: text.origin.y as f64,
        }));
    }

    fn draw_shape(&mut self, handle: &ShapeHandle, origin: Point, width: f32, height: f32) {
        self.push(RenderItem::Shape {
            handle: handle.as_str().to_string(),
            bounds: Rect::at(origin, width, height),
        });
    }

    fn draw_image(&mut self, image: &ImageRef, origin: Point, width: f32, height: f32) {
        self.push(RenderItem::Image {
            resource: image.resource.clone(),
            bounds: Rect::at(origin, width, height),
        });
    }

    fn draw_chart(&mut self, spec: &serde_json::Value, origin: Point, width: f32, height: f32) {
        self.push(RenderItem::Chart {
            spec: spec.clone(),
            bounds: Rect::at(origin, width, height),
        });
    }
}

impl PageSink for Recorder {
    fn open_page(&mut self, geometry: &PageGeometry) -> PageHandle {
        if let Some(index) = self.open {
            self.violation(format!("page {} opened while page {} is open", self.model.pages.len(), index));
        }
        let index = self.model.pages.len();
        self.model.add_page(PageRender::new(index as u32, geometry));
        self.closed.push(false);
        self.open = Some(index);
        PageHandle(index)
    }

    fn close_page(&mut self, page: PageHandle, fonts: &[FontId]) {
        let PageHandle(index) = page;
        match self.closed.get(index).copied() {
            None => self.violation(format!("close of unknown page {}", index)),
            Some(true) => self.violation(format!("page {} closed twice", index)),
            Some(false) => {
                self.closed[index] = true;
                self.model.pages[index].fonts = fonts.to_vec();
                if self.open == Some(index) {
                    self.open = None;
                }
            }
        }
    }
}
