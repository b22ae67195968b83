use serde::{Deserialize, Serialize};

/// Request payload for the paste based import endpoints
/// (`/api/import/preview` and `/api/import/apply`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasteImportRequest {
    pub text: String,
}
