//! Shared state for background import jobs.
//!
//! Applying an import touches the database row by row, so it runs outside the
//! request/response cycle (see `services::import::apply`). Handlers and
//! workers talk to each other through two pieces:
//! - `JobsState`: clonable handle injected into actix as `web::Data`, holding
//!   the status of every job and the sender side of the update channel.
//! - `start_job_updater`: the single task that drains `JobUpdate` messages
//!   and writes them into the status map.

use common::jobs::JobStatus;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::{mpsc, RwLock};

#[derive(Clone)]
pub struct JobsState {
    /// Job id → latest status. Read by `GET /api/import/status/{job_id}`,
    /// written by the updater task and by the scheduler when a job starts.
    pub jobs: Arc<RwLock<HashMap<String, JobStatus>>>,

    /// Workers push progress here instead of locking `jobs` themselves.
    pub tx: mpsc::Sender<JobUpdate>,
}

impl JobsState {
    /// Build an empty state and the receiver to hand to `start_job_updater`.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<JobUpdate>) {
        let (tx, rx) = mpsc::channel(capacity);
        let state = JobsState {
            jobs: Arc::new(RwLock::new(HashMap::new())),
            tx,
        };
        (state, rx)
    }
}

#[derive(Debug)]
pub struct JobUpdate {
    pub(crate) job_id: String,
    pub(crate) status: JobStatus,
}

/// Apply every `JobUpdate` received on `rx` to the shared map until all
/// senders are gone.
pub async fn start_job_updater(state: JobsState, mut rx: mpsc::Receiver<JobUpdate>) {
    while let Some(update) = rx.recv().await {
        let mut jobs = state.jobs.write().await;
        jobs.insert(update.job_id, update.status);
    }
}
