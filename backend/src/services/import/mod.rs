//! HTTP endpoints for importing reproduction sheets pasted from a spreadsheet.
//!
//! Routes under `/api/import`:
//! - `POST /preview`: JSON `{ "text": ... }`. Runs the resolver and returns
//!   the resolved records, the column map and the diagnostics. Read only.
//! - `POST /upload`: multipart body with a `file` part (`.txt`, `.tsv`,
//!   `.csv`, `.xlsx`, `.xls`, `.ods`). Same response as `/preview`.
//! - `POST /apply`: JSON `{ "text": ... }`. Starts a background job writing
//!   the records to the herd database and returns `{ "job_id": ... }`.
//! - `GET /status/{job_id}`: current `JobStatus` of an apply job.

use actix_web::web::{get, post, scope};
use actix_web::Scope;

mod apply;
mod get_status;
mod preview;
mod sheet;
mod upload;

const API_PATH: &str = "/api/import";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/preview", post().to(preview::process))
        .route("/upload", post().to(upload::process))
        .route("/apply", post().to(apply::process))
        .route("/status/{job_id}", get().to(get_status::process))
}
