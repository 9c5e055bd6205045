//! Spreadsheet text extraction (XLSX and legacy XLS).
//!
//! Every sheet is emitted under a `=== Sheet: <name> ===` header with
//! tab-joined cell values per row. Blank cells render as empty strings, and
//! rows that are entirely blank after joining are skipped.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xls, XlsError, Xlsx, XlsxError};

use crate::types::ExtractedText;

pub fn extract(data: &[u8], filename: &str, ext: &str) -> ExtractedText {
    let sheets = match ext {
        "xls" => read_xls(data),
        _ => read_xlsx(data),
    };

    let sheets = match sheets {
        Ok(sheets) => sheets,
        Err(e) => {
            return ExtractedText::error(filename, format!("Error reading spreadsheet: {}", e));
        }
    };

    let text = sheets_to_text(&sheets);

    if text.is_empty() {
        ExtractedText::empty(filename, "Excel file appears to be empty.")
    } else {
        ExtractedText::ok(filename, text)
    }
}

fn read_xlsx(data: &[u8]) -> Result<Vec<(String, Range<Data>)>, String> {
    let mut workbook: Xlsx<Cursor<&[u8]>> =
        open_workbook_from_rs(Cursor::new(data)).map_err(|e: XlsxError| e.to_string())?;
    collect_ranges(&mut workbook)
}

fn read_xls(data: &[u8]) -> Result<Vec<(String, Range<Data>)>, String> {
    let mut workbook: Xls<Cursor<&[u8]>> =
        open_workbook_from_rs(Cursor::new(data)).map_err(|e: XlsError| e.to_string())?;
    collect_ranges(&mut workbook)
}

fn collect_ranges<'a, R>(workbook: &mut R) -> Result<Vec<(String, Range<Data>)>, String>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::fmt::Display,
{
    let names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(names.len());

    for name in names {
        match workbook.worksheet_range(&name) {
            Ok(range) => sheets.push((name, range)),
            Err(e) => {
                tracing::warn!(sheet = %name, error = %e, "Error reading sheet, skipping");
            }
        }
    }

    Ok(sheets)
}

fn sheets_to_text(sheets: &[(String, Range<Data>)]) -> String {
    let mut text = String::new();
    let mut wrote_any_row = false;

    for (name, range) in sheets {
        text.push_str(&format!("=== Sheet: {} ===\n", name));

        for row in range.rows() {
            let row_text = row
                .iter()
                .map(|cell| cell.to_string())
                .collect::<Vec<_>>()
                .join("\t");

            if !row_text.trim().is_empty() {
                text.push_str(&row_text);
                text.push('\n');
                wrote_any_row = true;
            }
        }
    }

    // Sheets with no cell content reduce to bare headers; treat that the
    // same as no content at all.
    if !wrote_any_row {
        return String::new();
    }

    text.trim_end().to_string()
}
