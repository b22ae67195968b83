//! Turns an uploaded file into something the resolver understands.
//!
//! Plain text keeps its original spacing so the space-run heuristics still
//! apply. CSV files and workbooks are split into cells first and later joined
//! with tabs by `common::import::resolve_rows`.

use crate::error::ServiceError;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, PartialEq, Eq)]
pub enum SheetContent {
    Text(String),
    Rows(Vec<Vec<String>>),
}

pub fn read_upload(filename: &str, bytes: Vec<u8>) -> Result<SheetContent, ServiceError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" | "tsv" => Ok(SheetContent::Text(decode_text(&bytes))),
        "csv" => Ok(SheetContent::Rows(read_csv(&decode_text(&bytes))?)),
        "xlsx" | "xlsm" | "xls" | "ods" => Ok(SheetContent::Rows(read_workbook(bytes)?)),
        _ => Err(ServiceError::UnsupportedFile(filename.to_string())),
    }
}

/// UTF-8 when valid, otherwise Windows-1252, which is what spreadsheet
/// applications on Windows export by default.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

/// Most frequent candidate in the first line wins; comma when none appear.
pub fn detect_delimiter(first_line: &str) -> u8 {
    [b',', b';', b'\t', b'|']
        .into_iter()
        .map(|d| (d, first_line.matches(d as char).count()))
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map(|(d, _)| d)
        .unwrap_or(b',')
}

fn read_csv(text: &str) -> Result<Vec<Vec<String>>, ServiceError> {
    let delimiter = detect_delimiter(text.lines().next().unwrap_or(""));
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn read_workbook(bytes: Vec<u8>) -> Result<Vec<Vec<String>>, ServiceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ServiceError::EmptyWorkbook)??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

/// Date cells come back as serial numbers; render them the way a paste would.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a;b;c"), b';');
        assert_eq!(detect_delimiter("a\tb\tc,d"), b'\t');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[test]
    fn test_text_upload_keeps_spacing() {
        let content = read_upload("paste.TXT", b"A    1\n".to_vec()).unwrap();
        assert_eq!(content, SheetContent::Text("A    1\n".to_string()));
    }

    #[test]
    fn test_csv_upload_with_semicolons_and_latin1() {
        // "SÉRIE" encoded as Windows-1252.
        let bytes = b"S\xC9RIE;RG;TOURO\nA;1;\"IDEAL; A3\"\n".to_vec();
        let content = read_upload("herd.csv", bytes).unwrap();
        assert_eq!(
            content,
            SheetContent::Rows(vec![
                vec!["SÉRIE".to_string(), "RG".to_string(), "TOURO".to_string()],
                vec!["A".to_string(), "1".to_string(), "IDEAL; A3".to_string()],
            ])
        );
    }

    #[test]
    fn test_csv_upload_strips_bom() {
        let content = read_upload("herd.csv", b"\xEF\xBB\xBFSERIE,RG\n".to_vec()).unwrap();
        assert_eq!(
            content,
            SheetContent::Rows(vec![vec!["SERIE".to_string(), "RG".to_string()]])
        );
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(matches!(
            read_upload("herd.pdf", Vec::new()),
            Err(ServiceError::UnsupportedFile(_))
        ));
    }

    #[test]
    fn test_garbage_workbook_is_a_spreadsheet_error() {
        assert!(matches!(
            read_upload("herd.xlsx", b"not a zip".to_vec()),
            Err(ServiceError::Spreadsheet(_))
        ));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::String("IDEAL".to_string())), "IDEAL");
        assert_eq!(cell_text(&Data::Int(123)), "123");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
