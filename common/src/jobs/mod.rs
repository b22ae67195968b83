use crate::model::summary::ImportSummary;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    /// Percentage of rows processed.
    InProgress(u32),
    Completed(ImportSummary),
    Failed(String),
}
