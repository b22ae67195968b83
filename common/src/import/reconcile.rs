//! Field reconciliation: positional read followed by the shape heuristics.
//!
//! Spreadsheet pastes that collapse tabs into spaces lose blank cells, so
//! every value after a blank shifts one column to the left. The heuristics
//! below try to undo that shift by looking at what each value is shaped
//! like. They are guesses: a legitimately short sire name or a paddock
//! named like a bull will be misplaced without any way to notice.

use super::columns::ColumnMap;
use super::shape::{classify, TokenShape};
use super::tokenizer::TokenizedLine;
use crate::model::diagnostic::Diagnostic;
use crate::model::record::{Field, ImportRecord};

/// Result of a single heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub record: ImportRecord,
    pub diagnostic: Option<Diagnostic>,
}

impl Step {
    fn unchanged(record: ImportRecord) -> Self {
        Self {
            record,
            diagnostic: None,
        }
    }
}

pub type Heuristic = fn(&TokenizedLine, ImportRecord) -> Step;

/// Relocation heuristics, in the order they run. Only applied to lines that
/// were split on runs of spaces.
pub const RELOCATIONS: [Heuristic; 3] = [
    relocate_location_to_counterpart,
    scan_for_counterpart,
    recover_event_date,
];

/// Read every mapped field straight from its column.
pub fn read_mapped(line: &TokenizedLine, map: &ColumnMap) -> ImportRecord {
    let mut record = ImportRecord::new(line.line);
    for (field, index) in map.fields() {
        record.set(field, line.get(index));
    }
    record
}

/// Read a header-less line through the fixed layout of [`Field::ALL`].
pub fn read_positional(line: &TokenizedLine) -> ImportRecord {
    let mut record = ImportRecord::new(line.line);
    for (index, field) in Field::ALL.iter().enumerate() {
        record.set(*field, line.get(index));
    }
    record
}

/// Run the heuristic chain over a freshly read record.
///
/// The relocations run only for space-split lines: tab-split lines keep
/// their positions. Dropping a date from the sire column is the one rule
/// applied to tab-split lines too, so a date is never accepted as a sire
/// whatever the delimiter.
pub fn reconcile(line: &TokenizedLine, record: ImportRecord) -> (ImportRecord, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut step = discard_date_counterpart(line, record);
    diagnostics.extend(step.diagnostic.take());

    if line.uses_space_runs() {
        for heuristic in RELOCATIONS {
            step = heuristic(line, step.record);
            diagnostics.extend(step.diagnostic.take());
        }
    }
    (step.record, diagnostics)
}

/// A sire value shaped like a date is a shifted date, not a sire.
pub fn discard_date_counterpart(line: &TokenizedLine, mut record: ImportRecord) -> Step {
    if !classify(&record.counterpart).is_date_like() {
        return Step::unchanged(record);
    }
    let value = std::mem::take(&mut record.counterpart);
    Step {
        record,
        diagnostic: Some(Diagnostic::DateLikeCounterpartDiscarded {
            line: line.line,
            value,
        }),
    }
}

/// A blank location cell pulls the sire name into the location slot.
pub fn relocate_location_to_counterpart(line: &TokenizedLine, mut record: ImportRecord) -> Step {
    if !record.counterpart.is_empty() || classify(&record.location) != TokenShape::NameLike {
        return Step::unchanged(record);
    }
    record.counterpart = std::mem::take(&mut record.location);
    let value = record.counterpart.clone();
    Step {
        record,
        diagnostic: Some(Diagnostic::LocationRelocated {
            line: line.line,
            value,
        }),
    }
}

/// Take the first name shaped token not already used by another field.
pub fn scan_for_counterpart(line: &TokenizedLine, mut record: ImportRecord) -> Step {
    if !record.counterpart.is_empty() {
        return Step::unchanged(record);
    }
    let found = line
        .tokens
        .iter()
        .find(|t| t.shape.is_name_candidate() && !record.holds(&t.text));
    match found {
        Some(token) => {
            record.counterpart = token.text.clone();
            Step {
                record,
                diagnostic: Some(Diagnostic::CounterpartScanned {
                    line: line.line,
                    value: token.text.clone(),
                }),
            }
        }
        None => Step::unchanged(record),
    }
}

/// Take the first date shaped token that is not the diagnosis date.
///
/// The date is moved, not copied: a shifted row usually left it in another
/// field (typically the location), which is cleared.
pub fn recover_event_date(line: &TokenizedLine, mut record: ImportRecord) -> Step {
    if !record.event_date.is_empty() {
        return Step::unchanged(record);
    }
    let found = line
        .tokens
        .iter()
        .find(|t| t.shape.is_date_like() && t.text != record.followup_date);
    match found {
        Some(token) => {
            for field in [Field::Series, Field::NumericId, Field::Location, Field::Counterpart, Field::Result] {
                if record.get(field) == token.text {
                    record.set(field, "");
                }
            }
            record.event_date = token.text.clone();
            Step {
                record,
                diagnostic: Some(Diagnostic::EventDateRecovered {
                    line: line.line,
                    value: token.text.clone(),
                }),
            }
        }
        None => Step::unchanged(record),
    }
}
