use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors surfaced by the import endpoints.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("upload error: {0}")]
    Multipart(#[from] actix_multipart::MultipartError),
    #[error("missing '{0}' part in upload")]
    MissingPart(&'static str),
    #[error("upload exceeds {0} bytes")]
    PayloadTooLarge(usize),
    #[error("unsupported file type: '{0}'")]
    UnsupportedFile(String),
    #[error("workbook has no sheets")]
    EmptyWorkbook,
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Multipart(_)
            | ServiceError::MissingPart(_)
            | ServiceError::UnsupportedFile(_)
            | ServiceError::EmptyWorkbook
            | ServiceError::Spreadsheet(_)
            | ServiceError::Csv(_) => StatusCode::BAD_REQUEST,
            ServiceError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Database(_) | ServiceError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}

/// Errors that abort a background import job.
///
/// Kept apart from `ServiceError` because it crosses `spawn_blocking` and
/// must be `Send`; actix errors are not.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
