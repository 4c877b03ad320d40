//! Per-repository inspection and optional pull
//!
//! A probe runs diff → branch → last commit (stale mode) → pull (clean trees
//! only). Failures are written onto the row; only an authentication failure
//! during the pull escapes as a [`FatalError`].

use std::path::Path;
use tracing::{debug, warn};

use super::config::StatusConfig;
use super::discovery::RepoCandidate;
use super::error::{FatalError, ProbeStep, RepoError};
use super::report::ResultRow;
use crate::git::{SyncOutcome, VcsBackend};

fn probe_error(step: ProbeStep, err: anyhow::Error) -> RepoError {
    RepoError::Probe {
        step,
        message: super::clean_error_message(&format!("{err:#}")),
    }
}

/// Inspects one repository and builds its row
pub async fn probe(
    candidate: &RepoCandidate,
    config: &StatusConfig,
    backend: &dyn VcsBackend,
) -> Result<ResultRow, FatalError> {
    let path = candidate.path.as_path();
    let mut row = ResultRow::new(path);

    row.changed_summary = match backend.diff_summary(path).await {
        Ok(summary) => summary,
        Err(err) => {
            row.error = Some(probe_error(ProbeStep::Diff, err));
            return Ok(row);
        }
    };

    row.branch = match backend.current_branch(path).await {
        Ok(branch) => branch,
        Err(err) => {
            row.error = Some(probe_error(ProbeStep::Branch, err));
            return Ok(row);
        }
    };

    if config.stale_mode {
        match backend.last_commit_time(path).await {
            Ok(time) => row.last_commit_time = Some(time),
            Err(err) => row.error = Some(probe_error(ProbeStep::LastCommit, err)),
        }
    }

    // Never pull into a working tree with local modifications
    if config.enable_sync && !row.is_dirty() {
        let pull_error = match synchronize_with_retry(path, backend, config.max_retries).await {
            SyncOutcome::UpToDate => None,
            SyncOutcome::Applied => {
                row.was_synchronized = true;
                None
            }
            SyncOutcome::MissingRemoteRef => Some(RepoError::SyncMissingRef),
            SyncOutcome::Failed(message) => Some(RepoError::SyncTransient { message }),
            SyncOutcome::AuthFailure(message) => {
                return Err(FatalError::Authentication {
                    path: path.display().to_string(),
                    message,
                });
            }
        };
        if let Some(err) = pull_error {
            record_error(&mut row, err);
        }
    }

    Ok(row)
}

/// Keeps the first error on the row; later ones are only logged
fn record_error(row: &mut ResultRow, err: RepoError) {
    if row.error.is_some() {
        warn!(path = %row.path.display(), "{err}");
    } else {
        row.error = Some(err);
    }
}

/// Pulls `path`, retrying up to `max_retries` more times while the failure is transient
pub async fn synchronize_with_retry(
    path: &Path,
    backend: &dyn VcsBackend,
    max_retries: u32,
) -> SyncOutcome {
    let mut outcome = backend.synchronize(path).await;

    for attempt in 1..=max_retries {
        let SyncOutcome::Failed(message) = &outcome else {
            break;
        };
        warn!(path = %path.display(), attempt, "pull failed, retrying: {message}");
        outcome = backend.synchronize(path).await;
    }

    debug!(path = %path.display(), ?outcome, "pull finished");
    outcome
}
