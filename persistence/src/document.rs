//! FILENAME: persistence/src/document.rs
//! PURPOSE: Page layout for the paginated activity report.
//! CONTEXT: Layout is a pure planning pass over the document content. The PDF
//! writer only draws what the plan says, so the total page count is known
//! before any page footer is stamped.

use std::ops::Range;

use report_engine::{format_decimal, ActivityRow, AggregationNode};

// ============================================================================
// PAGE GEOMETRY (millimetres, A4 landscape)
// ============================================================================

pub const PAGE_WIDTH_MM: f32 = 297.0;
pub const PAGE_HEIGHT_MM: f32 = 210.0;
pub const MARGIN_MM: f32 = 25.0;

pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
pub const CONTENT_HEIGHT_MM: f32 = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM;

/// Table columns: name, start, end, center, departments, students, teachers, rating.
pub const TABLE_COLUMNS: [(&str, f32); 8] = [
    ("Nombre", 60.0),
    ("Inicio", 22.0),
    ("Fin", 22.0),
    ("Centro", 45.0),
    ("Departamentos", 56.0),
    ("Est.", 14.0),
    ("Prof.", 14.0),
    ("Val.", 14.0),
];

pub const TABLE_ROW_HEIGHT_MM: f32 = 7.0;
pub const TABLE_HEADER_HEIGHT_MM: f32 = 8.0;

/// Logo, title, subtitle, period, course and author lines.
pub const HEADER_BASE_HEIGHT_MM: f32 = 36.0;
/// Filter lines are laid out two per row.
pub const FILTER_LINE_HEIGHT_MM: f32 = 5.0;
pub const FILTER_COLUMNS: usize = 2;
/// Gap between the header block and the table.
pub const HEADER_GAP_MM: f32 = 4.0;

pub const SECTION_TITLE_HEIGHT_MM: f32 = 12.0;
pub const SUMMARY_LINE_HEIGHT_MM: f32 = 6.0;

pub const CHART_GRID_COLUMNS: usize = 2;
pub const CHART_GRID_ROWS: usize = 2;
pub const CHART_SLOTS: usize = CHART_GRID_COLUMNS * CHART_GRID_ROWS;

// ============================================================================
// CONTENT
// ============================================================================

/// A captured chart snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub png: Vec<u8>,
}

impl ChartImage {
    pub fn new(png: Vec<u8>) -> Self {
        ChartImage { png }
    }

    /// True when the bytes open with the PNG signature.
    pub fn is_png(&self) -> bool {
        self.png.starts_with(PNG_SIGNATURE)
    }
}

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// True when `bytes` start like a PNG or JPEG file.
pub fn looks_like_image(bytes: &[u8]) -> bool {
    bytes.starts_with(PNG_SIGNATURE) || bytes.starts_with(JPEG_SIGNATURE)
}

/// One position of the chart grid. A slot without an image stays blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSlot {
    pub title: String,
    pub image: Option<ChartImage>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentHeader {
    pub title: String,
    /// Report kind, printed under the title.
    pub subtitle: String,
    pub period: String,
    pub course: Option<String>,
    pub generated_by: String,
    /// Rendered "label: value" filter lines.
    pub filters: Vec<String>,
    /// PNG or JPEG bytes.
    pub logo: Option<Vec<u8>>,
}

impl DocumentHeader {
    pub fn height_mm(&self) -> f32 {
        let filter_rows = self.filters.len().div_ceil(FILTER_COLUMNS);
        HEADER_BASE_HEIGHT_MM + filter_rows as f32 * FILTER_LINE_HEIGHT_MM + HEADER_GAP_MM
    }
}

/// One line of the network summary page.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    /// 0 = network, 1 = quarter, 2 = center.
    pub depth: usize,
    pub label: String,
    pub actions: usize,
    pub participants: u64,
    pub average_rating: Option<f64>,
}

impl SummaryLine {
    pub fn render(&self) -> String {
        let rating = self
            .average_rating
            .map(|r| format_decimal(r, 2))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{}: {} actividades, {} participantes, valoración media {}",
            self.label, self.actions, self.participants, rating
        )
    }
}

/// Flattens the aggregation tree depth-first.
pub fn summary_lines(nodes: &[AggregationNode]) -> Vec<SummaryLine> {
    let mut lines = Vec::new();
    push_summary_lines(nodes, 0, &mut lines);
    lines
}

fn push_summary_lines(nodes: &[AggregationNode], depth: usize, lines: &mut Vec<SummaryLine>) {
    for node in nodes {
        lines.push(SummaryLine {
            depth,
            label: node.label.clone(),
            actions: node.total_actions,
            participants: node.total_students + node.total_teachers,
            average_rating: node.average_rating,
        });
        push_summary_lines(&node.children, depth + 1, lines);
    }
}

/// Everything the document shows.
#[derive(Debug, Clone, Default)]
pub struct DocumentContent {
    pub header: DocumentHeader,
    pub rows: Vec<ActivityRow>,
    /// Present for reports that include the network summary.
    pub summary: Option<Vec<SummaryLine>>,
    /// Grid slots in order. Empty when the report has no charts.
    pub charts: Vec<ChartSlot>,
}

impl DocumentContent {
    pub fn has_chart_images(&self) -> bool {
        self.charts.iter().any(|slot| slot.image.is_some())
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageContent {
    /// A slice of the activity table; the first page also carries the header block.
    Table { with_header_block: bool, rows: Range<usize> },
    Summary { lines: Range<usize> },
    Charts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// 1-based.
    pub number: usize,
    pub content: PageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn has_chart_page(&self) -> bool {
        self.pages.iter().any(|p| p.content == PageContent::Charts)
    }
}

pub fn page_label(number: usize, total: usize) -> String {
    format!("Página {} de {}", number, total)
}

fn rows_fitting(available_mm: f32) -> usize {
    let space = available_mm - TABLE_HEADER_HEIGHT_MM;
    if space <= 0.0 {
        0
    } else {
        (space / TABLE_ROW_HEIGHT_MM).floor() as usize
    }
}

/// Table rows that fit on the first page under the header block.
pub fn first_page_capacity(header: &DocumentHeader) -> usize {
    rows_fitting(CONTENT_HEIGHT_MM - header.height_mm())
}

/// Table rows that fit on a continuation page.
pub fn continuation_capacity() -> usize {
    rows_fitting(CONTENT_HEIGHT_MM)
}

pub fn summary_capacity() -> usize {
    ((CONTENT_HEIGHT_MM - SECTION_TITLE_HEIGHT_MM) / SUMMARY_LINE_HEIGHT_MM).floor() as usize
}

/// Splits the content into pages.
///
/// Page 1 always exists (header block plus the first table slice, possibly
/// empty). The table continues on as many pages as needed, followed by the
/// summary pages and, when at least one chart was captured, the chart page.
pub fn plan(content: &DocumentContent) -> DocumentLayout {
    let mut contents = Vec::new();

    let row_count = content.rows.len();
    let first = first_page_capacity(&content.header).min(row_count);
    contents.push(PageContent::Table { with_header_block: true, rows: 0..first });

    let per_page = continuation_capacity().max(1);
    let mut start = first;
    while start < row_count {
        let end = (start + per_page).min(row_count);
        contents.push(PageContent::Table { with_header_block: false, rows: start..end });
        start = end;
    }

    if let Some(lines) = &content.summary {
        // No lines, no summary page
        let per_page = summary_capacity().max(1);
        for start in (0..lines.len()).step_by(per_page) {
            let end = (start + per_page).min(lines.len());
            contents.push(PageContent::Summary { lines: start..end });
        }
    }

    if content.has_chart_images() {
        contents.push(PageContent::Charts);
    }

    DocumentLayout {
        pages: contents
            .into_iter()
            .enumerate()
            .map(|(i, content)| PageLayout { number: i + 1, content })
            .collect(),
    }
}

/// Lower-left corner and size of each grid slot on the chart page.
pub fn chart_slot_frames() -> [(f32, f32, f32, f32); CHART_SLOTS] {
    let gap = 8.0;
    let top = PAGE_HEIGHT_MM - MARGIN_MM - SECTION_TITLE_HEIGHT_MM;
    let cell_w = (CONTENT_WIDTH_MM - gap) / CHART_GRID_COLUMNS as f32;
    let cell_h = (top - MARGIN_MM - gap) / CHART_GRID_ROWS as f32;

    let mut frames = [(0.0, 0.0, 0.0, 0.0); CHART_SLOTS];
    for (slot, frame) in frames.iter_mut().enumerate() {
        let col = slot % CHART_GRID_COLUMNS;
        let row = slot / CHART_GRID_COLUMNS;
        let x = MARGIN_MM + col as f32 * (cell_w + gap);
        let y = top - (row as f32 + 1.0) * cell_h - row as f32 * gap;
        *frame = (x, y, cell_w, cell_h);
    }
    frames
}
