use super::sheet::{read_upload, SheetContent};
use crate::config::Config;
use crate::error::ServiceError;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use common::import::{self, ImportOutcome};
use futures_util::StreamExt;
use log::info;

/// `POST /api/import/upload`: resolve the first sheet of an uploaded file.
///
/// Expects a multipart body with a `file` part. Other parts are ignored.
pub(crate) async fn process(
    payload: Multipart,
    config: web::Data<Config>,
) -> Result<HttpResponse, ServiceError> {
    let outcome = resolve_upload(payload, config.max_payload_bytes).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

async fn resolve_upload(mut payload: Multipart, limit: usize) -> Result<ImportOutcome, ServiceError> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));
        if name.as_deref() != Some("file") {
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if bytes.len() + chunk.len() > limit {
                return Err(ServiceError::PayloadTooLarge(limit));
            }
            bytes.extend_from_slice(&chunk);
        }

        let outcome = match read_upload(&filename, bytes)? {
            SheetContent::Text(text) => import::resolve(&text),
            SheetContent::Rows(rows) => import::resolve_rows(&rows),
        };
        info!(
            "upload '{}' resolved {} records ({} diagnostics)",
            filename,
            outcome.records.len(),
            outcome.diagnostics.len()
        );
        return Ok(outcome);
    }
    Err(ServiceError::MissingPart("file"))
}
