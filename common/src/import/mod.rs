//! Tabular text import resolver.
//!
//! Turns text pasted from a spreadsheet (or the rows of an uploaded sheet)
//! into one [`ImportRecord`] per non-blank line. The pipeline is:
//!
//! 1. `header` decides whether the first non-blank line is a header row.
//! 2. `columns` builds a [`ColumnMap`] from that header, once.
//! 3. `tokenizer` splits every data line, falling back to the other
//!    delimiter when a line does not use the header's one.
//! 4. `reconcile` reads the mapped positions and applies the shape
//!    heuristics that undo column shifts.
//! 5. `emitter` collects records and diagnostics in input order.
//!
//! Resolution never fails. Anything that cannot be recovered is left as an
//! empty string and reported through a [`Diagnostic`].

pub mod columns;
pub mod emitter;
pub mod header;
pub mod reconcile;
pub mod shape;
pub mod tokenizer;

pub use columns::{ColumnMap, Delimiter};

use crate::model::diagnostic::Diagnostic;
use crate::model::record::ImportRecord;
use emitter::RowEmitter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub header_detected: bool,
    pub column_map: Option<ColumnMap>,
    pub records: Vec<ImportRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolve a pasted block of text.
pub fn resolve(text: &str) -> ImportOutcome {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .filter(|(_, l)| !l.trim().is_empty())
        .peekable();

    let mut emitter = RowEmitter::new();
    let mut header_detected = false;
    let mut column_map = None;

    if let Some((line_no, first)) = lines.peek().copied() {
        if header::looks_like_header(first) {
            header_detected = true;
            lines.next();
            column_map = ColumnMap::from_header(first);
            if column_map.is_none() {
                emitter.note(Diagnostic::HeaderWithoutColumnMap { line: line_no });
            }
        }
    }

    for (line_no, raw) in lines {
        let tokenized = match &column_map {
            Some(map) => tokenizer::tokenize_mapped(line_no, raw, map),
            None => tokenizer::tokenize_unmapped(line_no, raw),
        };
        if tokenized.fell_back {
            emitter.note(Diagnostic::DelimiterFallback {
                line: line_no,
                delimiter: tokenized.delimiter,
            });
        }
        let record = match &column_map {
            Some(map) => reconcile::read_mapped(&tokenized, map),
            None => reconcile::read_positional(&tokenized),
        };
        let (record, diagnostics) = reconcile::reconcile(&tokenized, record);
        emitter.emit(record, diagnostics);
    }

    let (records, diagnostics) = emitter.finish();
    ImportOutcome {
        header_detected,
        column_map,
        records,
        diagnostics,
    }
}

/// Resolve the rows of a sheet that was already split into cells.
///
/// Cells are joined with tabs so a workbook goes through exactly the same
/// path as a tab-delimited paste.
pub fn resolve_rows(rows: &[Vec<String>]) -> ImportOutcome {
    let text = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.replace(['\t', '\r', '\n'], " "))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n");
    resolve(&text)
}
