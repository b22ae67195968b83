use actix_web::{web, HttpResponse, Responder};
use common::import;
use common::requests::PasteImportRequest;
use log::info;

/// `POST /api/import/preview`: resolve pasted text without touching the database.
pub(crate) async fn process(payload: web::Json<PasteImportRequest>) -> impl Responder {
    let outcome = import::resolve(&payload.text);
    info!(
        "preview resolved {} records ({} diagnostics, header: {})",
        outcome.records.len(),
        outcome.diagnostics.len(),
        outcome.header_detected
    );
    HttpResponse::Ok().json(outcome)
}
