//! FILENAME: persistence/src/xlsx_writer.rs
//! PURPOSE: Writes the filtered activity listing as a single-sheet workbook.
//! CONTEXT: Rows arrive already resolved (report_engine::ActivityRow); this is
//! the only place multi-valued fields get flattened with a delimiter.

use crate::PersistenceError;
use report_engine::{ActivityRow, DEFAULT_DELIMITER};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

/// Header labels, in column order.
pub const SPREADSHEET_HEADERS: [&str; 16] = [
    "Nombre",
    "Ubicación",
    "Descripción",
    "Fecha Inicio",
    "Fecha Fin",
    "Red",
    "Centro",
    "Trimestre",
    "Departamentos",
    "Familias Profesionales",
    "Objetivos",
    "Estudiantes",
    "Profesores",
    "Total Participantes",
    "Valoración",
    "Comentarios",
];

/// Default cap for auto-sized columns, in characters.
pub const DEFAULT_MAX_COLUMN_WIDTH: usize = 60;

/// Extra characters added to the widest cell of each column.
const COLUMN_PADDING: usize = 2;

#[derive(Debug, Clone)]
pub struct SpreadsheetOptions {
    pub sheet_name: String,
    pub delimiter: String,
    pub max_column_width: usize,
}

impl Default for SpreadsheetOptions {
    fn default() -> Self {
        SpreadsheetOptions {
            sheet_name: "Actividades".to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }
}

// ============================================================================
// CELLS
// ============================================================================

enum SheetCell {
    Text(String),
    Number(f64),
}

impl SheetCell {
    fn display_width(&self) -> usize {
        match self {
            SheetCell::Text(s) => s.lines().map(|l| l.chars().count()).max().unwrap_or(0),
            SheetCell::Number(n) => format!("{}", n).len(),
        }
    }
}

/// Flattens a row into the 16 spreadsheet cells.
fn row_cells(row: &ActivityRow, delimiter: &str) -> [SheetCell; 16] {
    [
        SheetCell::Text(row.name.clone()),
        SheetCell::Text(row.location.clone()),
        SheetCell::Text(row.description.clone()),
        SheetCell::Text(row.start_date.clone()),
        SheetCell::Text(row.end_date.clone()),
        SheetCell::Text(row.network.clone()),
        SheetCell::Text(row.center.clone()),
        SheetCell::Text(row.quarter.clone()),
        SheetCell::Text(row.departments.join(delimiter)),
        SheetCell::Text(row.families.join(delimiter)),
        SheetCell::Text(row.objectives.join(delimiter)),
        SheetCell::Number(row.students as f64),
        SheetCell::Number(row.teachers as f64),
        SheetCell::Number(row.total_participants as f64),
        SheetCell::Number(row.rating as f64),
        SheetCell::Text(row.comments.clone()),
    ]
}

// ============================================================================
// WRITER
// ============================================================================

/// Builds the workbook and returns the XLSX bytes.
pub fn write_spreadsheet(rows: &[ActivityRow], options: &SpreadsheetOptions) -> Result<Vec<u8>, PersistenceError> {
    let mut xlsx = XlsxWorkbook::new();
    let worksheet = xlsx.add_worksheet();
    fill_worksheet(worksheet, rows, options)?;
    Ok(xlsx.save_to_buffer()?)
}

/// Same as `write_spreadsheet`, saved straight to `path`.
pub fn save_spreadsheet(rows: &[ActivityRow], options: &SpreadsheetOptions, path: &Path) -> Result<(), PersistenceError> {
    let mut xlsx = XlsxWorkbook::new();
    let worksheet = xlsx.add_worksheet();
    fill_worksheet(worksheet, rows, options)?;
    xlsx.save(path)?;
    Ok(())
}

fn fill_worksheet(
    worksheet: &mut Worksheet,
    rows: &[ActivityRow],
    options: &SpreadsheetOptions,
) -> Result<(), PersistenceError> {
    worksheet.set_name(&options.sheet_name)?;

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD9E1F2))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    // Column widths start at the header length
    let mut widths: Vec<usize> = SPREADSHEET_HEADERS.iter().map(|h| h.chars().count()).collect();

    for (col, header) in SPREADSHEET_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let excel_row = (i + 1) as u32;
        for (col, cell) in row_cells(row, &options.delimiter).iter().enumerate() {
            widths[col] = widths[col].max(cell.display_width());
            match cell {
                SheetCell::Text(s) => {
                    if !s.is_empty() {
                        worksheet.write_string(excel_row, col as u16, s)?;
                    }
                }
                SheetCell::Number(n) => {
                    worksheet.write_number(excel_row, col as u16, *n)?;
                }
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let capped = column_width(*width, options.max_column_width);
        worksheet.set_column_width(col as u16, capped as f64)?;
    }

    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofilter(0, 0, rows.len() as u32, (SPREADSHEET_HEADERS.len() - 1) as u16)?;

    Ok(())
}

/// max(header, widest cell) plus padding, capped.
pub fn column_width(widest: usize, cap: usize) -> usize {
    (widest + COLUMN_PADDING).min(cap)
}
