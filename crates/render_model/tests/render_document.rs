//! End-to-end layout into a recorded render model

use doc_model::{Document, FontPair, ImageRef, InlineItem, Paragraph, Run, Table, TableCell, TableRow};
use layout_engine::{LayoutError, LayoutSettings, Margins, PageConfig, Paginator};
use render_model::{Rect, Recorder, RenderConverter, RenderError, RenderItem, RenderModel};
use text_engine::{FontId, FontKind, FontMetrics, FontRegistry, StaticFontSource};

/// 200x200 page with 40pt margins: a 120x120 body at (40, 40) holding twelve
/// 10pt lines of 24 characters. The header area spans y 10..40, the footer
/// area y 160..180.
fn settings() -> LayoutSettings {
    let mut page = PageConfig::custom(200.0, 200.0).with_margins(Margins::uniform(40.0));
    page.header_footer.header_margin = 10.0;
    page.header_footer.footer_height = 20.0;
    LayoutSettings::default().with_page(page).with_default_baseline(10.0)
}

fn converter() -> RenderConverter {
    let metrics = FontMetrics::monospace("Mono", FontKind::Simple, 500);
    let registry = FontRegistry::new(StaticFontSource::new().with_font(metrics));
    RenderConverter::new(Paginator::new(settings(), registry))
}

fn para(text: &str) -> Paragraph {
    Paragraph::new().with_run(Run::utf16(text, FontPair::single("Mono"), 10.0))
}

fn doc(paragraphs: usize) -> Document {
    let mut doc = Document::new();
    for i in 0..paragraphs {
        doc.push(para(&format!("p{}", i)));
    }
    doc
}

fn origins(model: &RenderModel, page: usize) -> Vec<(f64, f64)> {
    model.pages[page].glyph_runs().map(|run| (run.x, run.y)).collect()
}

#[test]
fn test_paragraphs_fill_pages_in_order() {
    let (model, summary) = converter().convert(&doc(30)).unwrap();

    assert_eq!(summary.pages, 3);
    assert_eq!(model.page_count(), 3);
    let counts: Vec<usize> = model.pages.iter().map(|p| p.glyph_runs().count()).collect();
    assert_eq!(counts, vec![12, 12, 6]);

    assert_eq!(model.pages[1].page_index, 1);
    assert_eq!(model.pages[1].body, Rect::new(40.0, 40.0, 120.0, 120.0));
    assert_eq!(model.pages[1].glyph_runs().next().map(|r| r.text.as_str()), Some("p12"));
    assert_eq!(origins(&model, 2)[0], (40.0, 50.0));
    assert_eq!(origins(&model, 0)[11], (40.0, 160.0));
}

#[test]
fn test_every_page_reports_its_fonts() {
    let (model, _) = converter().convert(&doc(30)).unwrap();

    assert!(model.pages.iter().all(|p| p.fonts == vec![FontId(0)]));
    assert_eq!(model.font_name(FontId(0)), Some("Mono"));
    assert_eq!(model.fonts[0].kind, FontKind::Simple);
}

#[test]
fn test_font_table_reports_font_kind() {
    let metrics = FontMetrics::monospace("Wide", FontKind::Composite, 1000);
    let registry = FontRegistry::new(StaticFontSource::new().with_font(metrics));
    let mut converter = RenderConverter::new(Paginator::new(settings(), registry));
    let mut doc = Document::new();
    doc.push(Paragraph::new().with_run(Run::utf16("\u{AC00}", FontPair::new("Mono", "Wide"), 10.0)));

    let (model, _) = converter.convert(&doc).unwrap();
    let kinds: Vec<(&str, FontKind)> = model.fonts.iter().map(|f| (f.name.as_str(), f.kind)).collect();
    assert!(kinds.contains(&("Wide", FontKind::Composite)));
    assert_eq!(model.pages[0].text(), "\u{AC00}");
}

#[test]
fn test_empty_document_renders_one_blank_page() {
    let (model, summary) = converter().convert(&Document::new()).unwrap();

    assert_eq!(summary.pages, 1);
    assert_eq!(summary.blocks, 0);
    assert_eq!(model.page_count(), 1);
    assert!(model.pages[0].items.is_empty());
    assert!(model.pages[0].fonts.is_empty());
}

#[test]
fn test_long_paragraph_continues_on_next_page() {
    let mut doc = Document::new();
    let text: String = (0..15).map(|i| format!("line{}\n", i)).collect();
    doc.push(para(&text));

    let (model, summary) = converter().convert(&doc).unwrap();
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.suspensions, 1);
    assert_eq!(model.pages[0].glyph_runs().count(), 12);
    assert_eq!(model.pages[1].glyph_runs().next().map(|r| r.text.as_str()), Some("line12"));
    assert_eq!(origins(&model, 1)[0], (40.0, 50.0));
}

#[test]
fn test_header_and_footer_repeat() {
    let mut doc = doc(14);
    doc.header.push(para("head"));
    doc.footer.push(para("foot"));

    let (model, _) = converter().convert(&doc).unwrap();
    assert_eq!(model.page_count(), 2);
    for page in &model.pages {
        let runs: Vec<_> = page.glyph_runs().collect();
        assert_eq!(runs.first().map(|r| (r.text.as_str(), r.x, r.y)), Some(("head", 40.0, 20.0)));
        assert_eq!(runs.last().map(|r| (r.text.as_str(), r.x, r.y)), Some(("foot", 40.0, 170.0)));
    }
}

#[test]
fn test_inline_image_takes_its_own_slot() {
    let mut paragraph = para("ab");
    paragraph.push_image(ImageRef {
        resource: "logo".into(),
        width: 30.0,
        height: 15.0,
    });
    paragraph.push_run(Run::utf16("cd", FontPair::single("Mono"), 10.0));
    let mut doc = Document::new();
    doc.push(paragraph);

    let (model, _) = converter().convert(&doc).unwrap();
    let items = &model.pages[0].items;
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].as_glyph_run().map(|r| (r.x, r.y)), Some((40.0, 50.0)));
    assert_eq!(
        items[1],
        RenderItem::Image {
            resource: "logo".into(),
            bounds: Rect::new(40.0, 50.0, 30.0, 15.0)
        }
    );
    assert_eq!(items[2].as_glyph_run().map(|r| (r.x, r.y)), Some((40.0, 75.0)));
}

#[test]
fn test_image_that_does_not_fit_moves_to_next_page() {
    let mut doc = doc(11);
    let mut paragraph = Paragraph::new();
    paragraph.push_image(ImageRef {
        resource: "chart".into(),
        width: 50.0,
        height: 30.0,
    });
    doc.push(paragraph);

    let (model, summary) = converter().convert(&doc).unwrap();
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.suspensions, 1);
    assert_eq!(model.pages[1].items.len(), 1);
    assert_eq!(model.pages[1].items[0].bounds(), Some(Rect::new(40.0, 40.0, 50.0, 30.0)));
    assert!(model.pages[1].fonts.is_empty());
}

#[test]
fn test_table_rows_then_following_paragraph() {
    let cell = |text: &str| TableCell::new().with_paragraph(para(text));
    let mut table = Table::new(vec![50.0, 50.0]);
    // the second cell wraps onto two lines
    table.push_row(TableRow::new(vec![cell("ab"), cell("abcdefgh ijk")]));
    let mut doc = Document::new();
    doc.push(table);
    doc.push(para("tail"));

    let (model, summary) = converter().convert(&doc).unwrap();
    assert_eq!(summary.blocks, 2);
    assert_eq!(model.pages[0].text(), "ababcdefgh ijktail");
    assert_eq!(
        origins(&model, 0),
        vec![(40.0, 50.0), (90.0, 50.0), (90.0, 60.0), (40.0, 70.0)]
    );
}

#[test]
fn test_structural_error_keeps_closed_pages() {
    let mut doc = doc(2);
    let mut broken = para("x");
    broken.items.push(InlineItem::Chart(0));
    doc.push(broken);

    let err = converter().convert(&doc).unwrap_err();
    assert!(matches!(
        err,
        RenderError::Layout(LayoutError::Structural { paragraph: 2, item: 1, .. })
    ));

    let mut recorder = Recorder::new();
    assert!(converter().convert_into(&doc, &mut recorder).is_err());
    assert!(!recorder.is_open());
    let model = recorder.finish().unwrap();
    assert_eq!(model.page_count(), 1);
    assert_eq!(model.pages[0].text(), "p0p1");
}

#[test]
fn test_json_display_list() {
    let json = converter().convert_to_json(&doc(2)).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pages"][0]["items"][0]["type"], "GlyphRun");
    assert_eq!(value["pages"][0]["items"][0]["text"], "p0");
    assert_eq!(value["fonts"][0]["name"], "Mono");

    let model: RenderModel = serde_json::from_str(&json).unwrap();
    assert_eq!(model.pages[0].glyph_runs().count(), 2);
}
