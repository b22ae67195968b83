use crate::import::columns::Delimiter;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Advisory anomaly noticed while resolving a paste.
///
/// Diagnostics never stop an import; they are surfaced to the operator next
/// to the records so a human can double check the rows that were guessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A header row was recognised but had fewer than two cells.
    HeaderWithoutColumnMap { line: usize },
    /// A line did not use the header's delimiter; it was split on
    /// `delimiter` instead.
    DelimiterFallback { line: usize, delimiter: Delimiter },
    /// The sire column held a date, which was dropped.
    DateLikeCounterpartDiscarded { line: usize, value: String },
    /// The location cell held what looks like a sire name.
    LocationRelocated { line: usize, value: String },
    /// The sire name was found in a cell outside the mapped columns.
    CounterpartScanned { line: usize, value: String },
    /// The insemination date was found in a cell outside its column.
    EventDateRecovered { line: usize, value: String },
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        match self {
            Diagnostic::HeaderWithoutColumnMap { line }
            | Diagnostic::DelimiterFallback { line, .. }
            | Diagnostic::DateLikeCounterpartDiscarded { line, .. }
            | Diagnostic::LocationRelocated { line, .. }
            | Diagnostic::CounterpartScanned { line, .. }
            | Diagnostic::EventDateRecovered { line, .. } => *line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::HeaderWithoutColumnMap { line } => {
                write!(f, "line {}: header has fewer than two columns, ignoring it", line)
            }
            Diagnostic::DelimiterFallback {
                line,
                delimiter: Delimiter::SpaceRuns,
            } => write!(f, "line {}: no tabs found, split on runs of spaces", line),
            Diagnostic::DelimiterFallback {
                line,
                delimiter: Delimiter::Tab,
            } => write!(f, "line {}: tabs found under a space separated header, split on tabs", line),
            Diagnostic::DateLikeCounterpartDiscarded { line, value } => {
                write!(f, "line {}: sire '{}' looks like a date, discarded", line, value)
            }
            Diagnostic::LocationRelocated { line, value } => {
                write!(f, "line {}: moved '{}' from location to sire", line, value)
            }
            Diagnostic::CounterpartScanned { line, value } => {
                write!(f, "line {}: sire '{}' found outside its column", line, value)
            }
            Diagnostic::EventDateRecovered { line, value } => {
                write!(f, "line {}: insemination date '{}' found outside its column", line, value)
            }
        }
    }
}
