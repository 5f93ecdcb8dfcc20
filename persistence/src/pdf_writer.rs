//! FILENAME: persistence/src/pdf_writer.rs
//! PURPOSE: Draws a planned DocumentLayout with printpdf.
//! CONTEXT: Coordinates are in millimetres from the lower-left page corner,
//! so rows are placed top-down by subtracting from the top margin.

use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};
use report_engine::format::truncate_chars;
use report_engine::ActivityRow;

use crate::document::{
    chart_slot_frames, page_label, plan, DocumentContent, DocumentLayout, PageContent, FILTER_COLUMNS,
    FILTER_LINE_HEIGHT_MM, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, SECTION_TITLE_HEIGHT_MM,
    SUMMARY_LINE_HEIGHT_MM, TABLE_COLUMNS, TABLE_HEADER_HEIGHT_MM, TABLE_ROW_HEIGHT_MM, CONTENT_WIDTH_MM,
};
use crate::PersistenceError;

const TITLE_SIZE: f32 = 16.0;
const SECTION_SIZE: f32 = 13.0;
const TEXT_SIZE: f32 = 9.0;
const TABLE_SIZE: f32 = 8.0;
const FOOTER_SIZE: f32 = 8.0;

/// Rough Helvetica width at TABLE_SIZE, used to cut cell text to its column.
const TABLE_CHARS_PER_MM: f32 = 0.55;

const LOGO_HEIGHT_MM: f32 = 13.0;
const IMAGE_DPI: f32 = 300.0;
const MM_PER_INCH: f32 = 25.4;

fn gray(level: f32) -> Color {
    Color::Rgb(Rgb::new(level, level, level, None))
}

fn pdf_err<E: std::fmt::Debug>(e: E) -> PersistenceError {
    PersistenceError::PdfWrite(format!("{:?}", e))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

// ============================================================================
// ENTRY POINT
// ============================================================================

/// Lays out and renders the document, returning the PDF bytes.
///
/// A logo or chart image that does not decode is dropped before planning, so
/// its spot stays blank and a grid with no usable image gets no chart page.
pub fn write_document(content: &DocumentContent) -> Result<Vec<u8>, PersistenceError> {
    let content = without_undecodable_images(content);
    let layout = plan(&content);
    render(&content, &layout)
}

fn without_undecodable_images(content: &DocumentContent) -> DocumentContent {
    let mut cleaned = content.clone();
    if cleaned.header.logo.as_deref().is_some_and(|bytes| decode_rgb(bytes).is_err()) {
        cleaned.header.logo = None;
    }
    for slot in &mut cleaned.charts {
        if slot.image.as_ref().is_some_and(|chart| decode_rgb(&chart.png).is_err()) {
            slot.image = None;
        }
    }
    cleaned
}

/// Renders an already planned layout.
pub fn render(content: &DocumentContent, layout: &DocumentLayout) -> Result<Vec<u8>, PersistenceError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        content.header.title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Capa 1",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?,
    };

    let total = layout.page_count();
    for page in &layout.pages {
        let layer = if page.number == 1 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Capa 1");
            doc.get_page(p).get_layer(l)
        };

        match &page.content {
            PageContent::Table { with_header_block, rows } => {
                let mut top = PAGE_HEIGHT_MM - MARGIN_MM;
                if *with_header_block {
                    draw_header_block(&layer, &fonts, content);
                    top -= content.header.height_mm();
                }
                draw_table(&layer, &fonts, &content.rows[rows.clone()], top);
            }
            PageContent::Summary { lines } => {
                if let Some(summary) = &content.summary {
                    draw_summary(&layer, &fonts, &summary[lines.clone()]);
                }
            }
            PageContent::Charts => draw_charts(&layer, &fonts, content),
        }

        draw_footer(&layer, &fonts, page.number, total);
    }

    save(doc)
}

fn save(doc: PdfDocumentReference) -> Result<Vec<u8>, PersistenceError> {
    doc.save_to_bytes().map_err(pdf_err)
}

// ============================================================================
// SECTIONS
// ============================================================================

fn draw_header_block(layer: &PdfLayerReference, fonts: &Fonts, content: &DocumentContent) {
    let header = &content.header;
    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    let mut text_x = MARGIN_MM;

    if let Some(image) = header.logo.as_deref().and_then(|bytes| decode_rgb(bytes).ok()) {
        let (w, h) = image.dimensions();
        let natural_h = h as f32 * MM_PER_INCH / IMAGE_DPI;
        let natural_w = w as f32 * MM_PER_INCH / IMAGE_DPI;
        let scale = if natural_h > 0.0 { LOGO_HEIGHT_MM / natural_h } else { 1.0 };
        place_image(layer, &image, MARGIN_MM, top - LOGO_HEIGHT_MM, scale);
        text_x += natural_w * scale + 6.0;
    }

    layer.use_text(header.title.as_str(), TITLE_SIZE, Mm(text_x), Mm(top - 6.0), &fonts.bold);
    layer.use_text(header.subtitle.as_str(), TEXT_SIZE, Mm(text_x), Mm(top - 12.0), &fonts.regular);
    layer.use_text(
        format!("Periodo: {}", header.period),
        TEXT_SIZE,
        Mm(MARGIN_MM),
        Mm(top - 19.0),
        &fonts.regular,
    );
    if let Some(course) = &header.course {
        layer.use_text(format!("Curso: {}", course), TEXT_SIZE, Mm(MARGIN_MM), Mm(top - 24.0), &fonts.regular);
    }
    layer.use_text(
        format!("Generado por: {}", header.generated_by),
        TEXT_SIZE,
        Mm(MARGIN_MM),
        Mm(top - 29.0),
        &fonts.regular,
    );

    layer.use_text("Filtros aplicados", TEXT_SIZE, Mm(MARGIN_MM), Mm(top - 34.0), &fonts.bold);
    let column_width = CONTENT_WIDTH_MM / FILTER_COLUMNS as f32;
    for (i, line) in header.filters.iter().enumerate() {
        let col = i % FILTER_COLUMNS;
        let row = i / FILTER_COLUMNS;
        layer.use_text(
            line.as_str(),
            TEXT_SIZE,
            Mm(MARGIN_MM + col as f32 * column_width),
            Mm(top - 34.0 - (row as f32 + 1.0) * FILTER_LINE_HEIGHT_MM),
            &fonts.regular,
        );
    }
}

fn table_cells(row: &ActivityRow) -> [String; 8] {
    [
        row.name.clone(),
        row.start_date.clone(),
        row.end_date.clone(),
        row.center.clone(),
        row.departments.join(", "),
        row.students.to_string(),
        row.teachers.to_string(),
        row.rating.to_string(),
    ]
}

fn draw_row_text(layer: &PdfLayerReference, font: &IndirectFontRef, cells: &[String], baseline: f32) {
    let mut x = MARGIN_MM;
    for (text, (_, width)) in cells.iter().zip(TABLE_COLUMNS.iter()) {
        let max_chars = (width * TABLE_CHARS_PER_MM).floor() as usize;
        layer.use_text(truncate_chars(text, max_chars), TABLE_SIZE, Mm(x + 1.0), Mm(baseline), font);
        x += width;
    }
}

fn table_width() -> f32 {
    TABLE_COLUMNS.iter().map(|(_, w)| w).sum()
}

fn draw_table(layer: &PdfLayerReference, fonts: &Fonts, rows: &[ActivityRow], top: f32) {
    let width = table_width();

    // Column header, repeated on every table page
    let header_bottom = top - TABLE_HEADER_HEIGHT_MM;
    layer.set_fill_color(gray(0.80));
    layer.add_rect(Rect::new(Mm(MARGIN_MM), Mm(header_bottom), Mm(MARGIN_MM + width), Mm(top)));
    layer.set_fill_color(gray(0.0));
    let labels: Vec<String> = TABLE_COLUMNS.iter().map(|(label, _)| label.to_string()).collect();
    draw_row_text(layer, &fonts.bold, &labels, header_bottom + 2.5);

    let mut row_top = header_bottom;
    for (i, row) in rows.iter().enumerate() {
        let row_bottom = row_top - TABLE_ROW_HEIGHT_MM;
        if i % 2 == 1 {
            layer.set_fill_color(gray(0.94));
            layer.add_rect(Rect::new(Mm(MARGIN_MM), Mm(row_bottom), Mm(MARGIN_MM + width), Mm(row_top)));
            layer.set_fill_color(gray(0.0));
        }
        draw_row_text(layer, &fonts.regular, &table_cells(row), row_bottom + 2.2);
        row_top = row_bottom;
    }
}

fn draw_summary(layer: &PdfLayerReference, fonts: &Fonts, lines: &[crate::document::SummaryLine]) {
    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    layer.use_text("Resumen por red", SECTION_SIZE, Mm(MARGIN_MM), Mm(top - 7.0), &fonts.bold);

    let mut y = top - SECTION_TITLE_HEIGHT_MM;
    for line in lines {
        let font = if line.depth == 0 { &fonts.bold } else { &fonts.regular };
        let indent = line.depth as f32 * 8.0;
        layer.use_text(line.render(), TEXT_SIZE, Mm(MARGIN_MM + indent), Mm(y - 4.0), font);
        y -= SUMMARY_LINE_HEIGHT_MM;
    }
}

fn draw_charts(layer: &PdfLayerReference, fonts: &Fonts, content: &DocumentContent) {
    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    layer.use_text("Gráficos", SECTION_SIZE, Mm(MARGIN_MM), Mm(top - 7.0), &fonts.bold);

    // Slots keep their grid position; a missing image leaves its cell blank
    for (slot, (x, y, w, h)) in content.charts.iter().zip(chart_slot_frames()) {
        let Some(image) = slot.image.as_ref().and_then(|chart| decode_rgb(&chart.png).ok()) else {
            continue;
        };

        layer.use_text(slot.title.as_str(), TEXT_SIZE, Mm(x), Mm(y + h - 4.0), &fonts.bold);
        let (px_w, px_h) = image.dimensions();
        let natural_w = px_w as f32 * MM_PER_INCH / IMAGE_DPI;
        let natural_h = px_h as f32 * MM_PER_INCH / IMAGE_DPI;
        let box_h = h - 7.0;
        if natural_w <= 0.0 || natural_h <= 0.0 || box_h <= 0.0 {
            continue;
        }
        let scale = (w / natural_w).min(box_h / natural_h);
        place_image(layer, &image, x, y, scale);
    }
}

fn draw_footer(layer: &PdfLayerReference, fonts: &Fonts, number: usize, total: usize) {
    let label = page_label(number, total);
    layer.use_text(label, FOOTER_SIZE, Mm(PAGE_WIDTH_MM - MARGIN_MM - 25.0), Mm(MARGIN_MM / 2.0), &fonts.regular);
}

// ============================================================================
// IMAGES
// ============================================================================

/// Decodes PNG/JPEG bytes into an RGB image (alpha is dropped).
fn decode_rgb(bytes: &[u8]) -> Result<DynamicImage, PersistenceError> {
    let decoded = image_crate::load_from_memory(bytes).map_err(|e| PersistenceError::Image(e.to_string()))?;
    Ok(DynamicImage::ImageRgb8(decoded.to_rgb8()))
}

fn place_image(layer: &PdfLayerReference, image: &DynamicImage, x: f32, y: f32, scale: f32) {
    Image::from_dynamic_image(image).add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(x)),
            translate_y: Some(Mm(y)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
}
