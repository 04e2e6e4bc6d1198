//! Lay a document out into a render model

use crate::{FontEntry, Recorder, RenderModel, Result};
use doc_model::Document;
use layout_engine::{PaginationSummary, Paginator};
use text_engine::{FontId, MetricsProvider};

/// Runs pagination into a [`Recorder`]
#[derive(Debug)]
pub struct RenderConverter {
    paginator: Paginator,
}

impl RenderConverter {
    pub fn new(paginator: Paginator) -> Self {
        Self { paginator }
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Convert a document to a render model.
    ///
    /// On a layout error the pages produced so far are discarded; use
    /// [`RenderConverter::convert_into`] to keep them.
    pub fn convert(&mut self, doc: &Document) -> Result<(RenderModel, PaginationSummary)> {
        let mut recorder = Recorder::new();
        let summary = self.convert_into(doc, &mut recorder)?;
        let mut model = recorder.finish()?;
        model.fonts = self.font_table();
        tracing::debug!(pages = model.page_count(), fonts = model.fonts.len(), "render model built");
        Ok((model, summary))
    }

    /// Paginate into a caller-owned recorder
    pub fn convert_into(&mut self, doc: &Document, recorder: &mut Recorder) -> Result<PaginationSummary> {
        Ok(self.paginator.paginate(doc, recorder)?)
    }

    /// Convert and serialize the render model as JSON
    pub fn convert_to_json(&mut self, doc: &Document) -> Result<String> {
        let (model, _) = self.convert(doc)?;
        Ok(serde_json::to_string_pretty(&model)?)
    }

    fn font_table(&self) -> Vec<FontEntry> {
        let registry = self.paginator.registry();
        (0..registry.len() as u32)
            .map(FontId)
            .filter_map(|id| {
                registry.name(id).map(|name| FontEntry {
                    id,
                    name: name.to_string(),
                    kind: registry.font_type(id),
                })
            })
            .collect()
    }
}
