use serde::{Deserialize, Serialize};

/// Outcome of applying an import to the herd database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub applied: usize,
    pub failed: usize,
    /// Rows not written because the exact same paste was applied before.
    pub skipped_duplicate: usize,
    pub failures: Vec<RowFailure>,
}

/// A single row rejected while applying an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    pub line: usize,
    pub series: String,
    pub numeric_id: String,
    pub reason: String,
}
