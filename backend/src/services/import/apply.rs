//! # Import Apply Job
//!
//! `POST /api/import/apply` writes a pasted reproduction sheet into the herd
//! database. The handler only schedules the work and returns a `job_id`; the
//! client polls `GET /api/import/status/{job_id}` until the job reaches
//! `Completed(ImportSummary)` or `Failed(message)`.
//!
//! ## Workflow
//!
//! 1. The paste is hashed (MD5). A paste already applied is not written
//!    again; every row is reported as `skipped_duplicate`.
//! 2. The text goes through `common::import::resolve`.
//! 3. Each record is checked and written inside a single transaction:
//!    - series and RG must be present and name an existing animal;
//!    - the insemination date must be `DD/MM/YYYY`, the diagnosis date too
//!      when present;
//!    - the diagnosis result must be a known pregnant/open marker.
//!
//!    A rejected row is counted and reported, never fatal. Database errors
//!    abort the job and roll everything back.
//! 4. Progress is pushed as a percentage through the job channel.

use crate::config::Config;
use crate::db::{self, Insemination};
use crate::error::JobError;
use crate::job_controller::state::{JobUpdate, JobsState};
use actix_web::{web, HttpResponse, Responder};
use chrono::NaiveDate;
use common::import;
use common::import::shape::{classify, TokenShape};
use common::jobs::JobStatus;
use common::model::record::ImportRecord;
use common::model::summary::{ImportSummary, RowFailure};
use common::requests::PasteImportRequest;
use log::{info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Why a single record could not be applied.
#[derive(Debug, Error)]
enum RowError {
    #[error("missing series or RG")]
    MissingIdentity,
    #[error("animal not found")]
    AnimalNotFound,
    #[error("invalid insemination date '{0}'")]
    InvalidEventDate(String),
    #[error("invalid diagnosis date '{0}'")]
    InvalidFollowupDate(String),
    #[error("unrecognized diagnosis result '{0}'")]
    UnknownResult(String),
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
}

pub(crate) async fn process(
    state: web::Data<JobsState>,
    config: web::Data<Config>,
    payload: web::Json<PasteImportRequest>,
) -> impl Responder {
    let job_id = schedule_apply_job(state, config.database.clone(), payload.into_inner().text).await;
    HttpResponse::Ok().json(serde_json::json!({ "job_id": job_id }))
}

/// Register the job as `Pending` and run it on the blocking pool.
async fn schedule_apply_job(state: web::Data<JobsState>, database: PathBuf, text: String) -> String {
    let job_id = Uuid::new_v4().to_string();
    state
        .jobs
        .write()
        .await
        .insert(job_id.clone(), JobStatus::Pending);

    let tx = state.tx.clone();
    let job_id_clone = job_id.clone();

    tokio::spawn(async move {
        let tx_block = tx.clone();
        let job_id_for_blocking = job_id_clone.clone();
        let handle = tokio::task::spawn_blocking(move || {
            apply_blocking(&tx_block, &job_id_for_blocking, &database, &text)
        });

        let status = match handle.await {
            Ok(Ok(summary)) => {
                info!(
                    "import job {} done: {} applied, {} failed, {} duplicate",
                    job_id_clone, summary.applied, summary.failed, summary.skipped_duplicate
                );
                JobStatus::Completed(summary)
            }
            Ok(Err(e)) => {
                warn!("import job {} failed: {}", job_id_clone, e);
                JobStatus::Failed(e.to_string())
            }
            Err(e) => JobStatus::Failed(format!("Task join error: {}", e)),
        };
        let _ = tx
            .send(JobUpdate {
                job_id: job_id_clone,
                status,
            })
            .await;
    });

    job_id
}

/// Synchronous body of the job, meant for `spawn_blocking`.
pub(crate) fn apply_blocking(
    tx: &mpsc::Sender<JobUpdate>,
    job_id: &str,
    database: &Path,
    text: &str,
) -> Result<ImportSummary, JobError> {
    let _ = tx.blocking_send(JobUpdate {
        job_id: job_id.to_string(),
        status: JobStatus::InProgress(0),
    });

    let mut conn = db::open(database)?;
    apply_text(&mut conn, text, |percent| {
        let _ = tx.blocking_send(JobUpdate {
            job_id: job_id.to_string(),
            status: JobStatus::InProgress(percent),
        });
    })
}

/// Resolve `text` and write every acceptable record through `conn`.
///
/// `progress` receives a percentage each time it changes.
pub(crate) fn apply_text(
    conn: &mut Connection,
    text: &str,
    mut progress: impl FnMut(u32),
) -> Result<ImportSummary, JobError> {
    let digest = format!("{:x}", md5::compute(text.as_bytes()));
    let outcome = import::resolve(text);
    let total = outcome.records.len();

    if db::batch_applied(conn, &digest)? {
        info!("paste {} already applied, skipping {} records", digest, total);
        progress(100);
        return Ok(ImportSummary {
            total,
            skipped_duplicate: total,
            ..ImportSummary::default()
        });
    }

    let tx = conn.transaction()?;
    let mut summary = ImportSummary {
        total,
        ..ImportSummary::default()
    };
    let mut last_percent = 0;

    for (i, record) in outcome.records.iter().enumerate() {
        match apply_record(&tx, record) {
            Ok(()) => summary.applied += 1,
            Err(RowError::Database(e)) => return Err(e.into()),
            Err(e) => {
                summary.failed += 1;
                summary.failures.push(RowFailure {
                    line: record.line,
                    series: record.series.clone(),
                    numeric_id: record.numeric_id.clone(),
                    reason: e.to_string(),
                });
            }
        }

        let percent = ((i + 1) * 100 / total) as u32;
        if percent != last_percent {
            last_percent = percent;
            progress(percent);
        }
    }

    db::record_batch(&tx, &digest, total)?;
    tx.commit()?;
    Ok(summary)
}

fn apply_record(conn: &Connection, record: &ImportRecord) -> Result<(), RowError> {
    if record.series.is_empty() || record.numeric_id.is_empty() {
        return Err(RowError::MissingIdentity);
    }
    let animal_id =
        db::find_animal(conn, &record.series, &record.numeric_id)?.ok_or(RowError::AnimalNotFound)?;

    let event_date = parse_date(&record.event_date)
        .ok_or_else(|| RowError::InvalidEventDate(record.event_date.clone()))?;
    let followup_date = if record.followup_date.is_empty() {
        None
    } else {
        Some(
            parse_date(&record.followup_date)
                .ok_or_else(|| RowError::InvalidFollowupDate(record.followup_date.clone()))?,
        )
    };
    let result = normalize_result(&record.result)?;

    db::upsert_insemination(
        conn,
        &Insemination {
            animal_id,
            sire: non_empty(&record.counterpart),
            event_date,
            followup_date,
            result,
        },
    )?;
    // A date in the location slot is a shifted cell, never a paddock.
    let location = classify(&record.location);
    if location != TokenShape::Empty && !location.is_date_like() {
        db::update_animal_location(conn, animal_id, &record.location)?;
    }
    Ok(())
}

/// `DD/MM/YYYY` to ISO `YYYY-MM-DD`.
fn parse_date(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn normalize_result(value: &str) -> Result<Option<&'static str>, RowError> {
    match value.trim().to_uppercase().as_str() {
        "" => Ok(None),
        "P" | "PRENHA" | "POSITIVO" => Ok(Some("pregnant")),
        "V" | "VAZIA" | "NEGATIVO" => Ok(Some("open")),
        _ => Err(RowError::UnknownResult(value.to_string())),
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "Série\tRG\tLocal\tTouro\tData IA\tData DG\tResultado\n\
                         CJCJ\t101\tPIQUETE 3\tIDEAL\t01/01/2024\t01/03/2024\tP\n\
                         CJCJ\t102\t\tFORTUNA\t02/01/2024\t\t\n\
                         CJCJ\t999\t\tFORTUNA\t02/01/2024\t\t\n\
                         CJCJ\t103\t\tFORTUNA\t31/02/2024\t\t\n\
                         CJCJ\t101\t\tIDEAL\t05/01/2024\t\tTALVEZ\n\
                         \t\t\tIDEAL\t05/01/2024\t\t";

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        for rg in ["101", "102", "103"] {
            db::insert_animal(&conn, "CJCJ", rg).unwrap();
        }
        conn
    }

    fn count(conn: &Connection, sql: &str) -> i64 {
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_apply_counts_successes_and_failures() {
        let mut conn = seeded();
        let mut reported = Vec::new();
        let summary = apply_text(&mut conn, SHEET, |p| reported.push(p)).unwrap();

        assert_eq!(summary.total, 6);
        assert_eq!(summary.applied, 2);
        assert_eq!(summary.failed, 4);
        let reasons: Vec<(usize, &str)> = summary
            .failures
            .iter()
            .map(|f| (f.line, f.reason.as_str()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (4, "animal not found"),
                (5, "invalid insemination date '31/02/2024'"),
                (6, "unrecognized diagnosis result 'TALVEZ'"),
                (7, "missing series or RG"),
            ]
        );
        assert_eq!(reported.last(), Some(&100));
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM inseminations"), 2);

        let (sire, result, followup): (String, String, String) = conn
            .query_row(
                "SELECT sire, result, followup_date FROM inseminations WHERE event_date = '2024-01-01'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!((sire.as_str(), result.as_str(), followup.as_str()), ("IDEAL", "pregnant", "2024-03-01"));

        let location: String = conn
            .query_row("SELECT location FROM animals WHERE rg = '101'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(location, "PIQUETE 3");
    }

    #[test]
    fn test_shifted_date_never_becomes_a_location() {
        let mut conn = seeded();
        let summary = apply_text(&mut conn, "SÉRIE    RG    LOCAL    DATA IA\nCJCJ    101    05/06/2024", |_| {}).unwrap();
        assert_eq!(summary.applied, 1);

        let location: Option<String> = conn
            .query_row("SELECT location FROM animals WHERE rg = '101'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(location, None);
        assert_eq!(
            count(&conn, "SELECT COUNT(*) FROM inseminations WHERE event_date = '2024-06-05'"),
            1
        );
    }

    #[test]
    fn test_date_shaped_location_is_not_stored() {
        let conn = seeded();
        let record = ImportRecord {
            line: 2,
            series: "CJCJ".to_string(),
            numeric_id: "102".to_string(),
            location: "05/06/2024".to_string(),
            event_date: "05/06/2024".to_string(),
            ..ImportRecord::default()
        };
        apply_record(&conn, &record).unwrap();
        let location: Option<String> = conn
            .query_row("SELECT location FROM animals WHERE rg = '102'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(location, None);
    }

    #[test]
    fn test_same_paste_is_applied_once() {
        let mut conn = seeded();
        apply_text(&mut conn, SHEET, |_| {}).unwrap();
        let again = apply_text(&mut conn, SHEET, |_| {}).unwrap();
        assert_eq!(again.skipped_duplicate, 6);
        assert_eq!(again.applied, 0);
        assert_eq!(count(&conn, "SELECT COUNT(*) FROM import_batches"), 1);
    }

    #[test]
    fn test_empty_paste() {
        let mut conn = seeded();
        let summary = apply_text(&mut conn, "\n\n", |_| {}).unwrap();
        assert_eq!(summary, ImportSummary::default());
    }

    #[test]
    fn test_normalize_result() {
        assert_eq!(normalize_result(" p ").unwrap(), Some("pregnant"));
        assert_eq!(normalize_result("Vazia").unwrap(), Some("open"));
        assert_eq!(normalize_result("").unwrap(), None);
        assert!(normalize_result("?").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("01/02/2024").as_deref(), Some("2024-02-01"));
        assert_eq!(parse_date("1/2/2024").as_deref(), Some("2024-02-01"));
        assert_eq!(parse_date("2024-02-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_apply_blocking_reports_progress() {
        let dir = tempfile::tempdir().unwrap();
        let database = dir.path().join("herd.sqlite");
        {
            let conn = db::open(&database).unwrap();
            db::insert_animal(&conn, "CJCJ", "101").unwrap();
        }
        let (tx, mut rx) = mpsc::channel(16);
        let summary = apply_blocking(
            &tx,
            "job-1",
            &database,
            "SÉRIE\tRG\tTOURO\tDATA IA\nCJCJ\t101\tIDEAL\t01/01/2024",
        )
        .unwrap();
        drop(tx);

        assert_eq!(summary.applied, 1);
        let mut statuses = Vec::new();
        while let Ok(update) = rx.try_recv() {
            assert_eq!(update.job_id, "job-1");
            statuses.push(update.status);
        }
        assert_eq!(statuses, vec![JobStatus::InProgress(0), JobStatus::InProgress(100)]);
    }
}
