//! Bounded-concurrency dispatch of probe tasks

use futures::stream::{FuturesUnordered, StreamExt};
use rayon::prelude::*;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tracing::{debug, error};

use super::discovery::RepoCandidate;
use super::error::{FatalError, RepoError};
use super::report::{ResultCollector, ResultRow};

/// What a finished run hands back to the caller
#[derive(Debug)]
pub struct RunReport {
    /// Published rows, in completion order
    pub rows: Vec<ResultRow>,
    /// Set when a task aborted the run
    pub fatal: Option<FatalError>,
    /// Candidates never started because of the abort
    pub skipped: usize,
}

/// Orders candidates so the largest repositories start first
pub fn order_by_size(candidates: &mut [RepoCandidate]) {
    candidates.par_sort_by(|a, b| b.size_hint.cmp(&a.size_hint));
}

/// Runs `task` once for every candidate with at most `limit` running at a time
///
/// Candidates are dispatched largest first. Each task's row is published to a
/// shared collector. When a task returns a [`FatalError`] no further
/// candidates are started, tasks already running are awaited, and the error is
/// reported in [`RunReport::fatal`]. Returns only after every started task has
/// finished.
pub async fn run_all<F, Fut>(mut candidates: Vec<RepoCandidate>, limit: usize, task: F) -> RunReport
where
    F: Fn(RepoCandidate) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ResultRow, FatalError>> + Send + 'static,
{
    order_by_size(&mut candidates);

    let total = candidates.len();
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let collector = ResultCollector::new();
    let aborted = Arc::new(AtomicBool::new(false));
    let fatal: Arc<Mutex<Option<FatalError>>> = Arc::new(Mutex::new(None));
    let task = Arc::new(task);

    let mut handles = FuturesUnordered::new();
    let mut started = 0;

    for candidate in candidates {
        // Waits here until a slot frees up
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("worker pool closed unexpectedly: {e}");
                break;
            }
        };
        if aborted.load(Ordering::Acquire) {
            break;
        }
        started += 1;

        let task_clone = Arc::clone(&task);
        let collector_clone = collector.clone();
        let aborted_clone = Arc::clone(&aborted);
        let fatal_clone = Arc::clone(&fatal);
        let path = candidate.path.clone();

        let handle = tokio::spawn(async move {
            match task_clone(candidate).await {
                Ok(row) => collector_clone.publish(row),
                Err(err) => {
                    error!("aborting run: {err}");
                    let mut slot = fatal_clone.lock().unwrap_or_else(PoisonError::into_inner);
                    if slot.is_none() {
                        *slot = Some(err);
                    }
                    drop(slot);
                    aborted_clone.store(true, Ordering::Release);
                }
            }
            // The slot is released only after the abort flag is visible
            drop(permit);
        });
        handles.push(async move { (path, handle.await) });
    }

    while let Some((path, joined)) = handles.next().await {
        if let Err(e) = joined {
            error!(path = %path.display(), "probe task failed: {e}");
            let mut row = ResultRow::new(path);
            row.error = Some(RepoError::TaskFailed {
                message: e.to_string(),
            });
            collector.publish(row);
        }
    }

    let fatal = fatal.lock().unwrap_or_else(PoisonError::into_inner).take();
    debug!(total, started, "run complete");

    RunReport {
        rows: collector.drain(),
        fatal,
        skipped: total - started,
    }
}
