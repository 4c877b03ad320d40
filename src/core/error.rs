//! Error taxonomy for a status run
//!
//! Per-repository failures are values stored on the repository's row. Only
//! [`FatalError`] travels past the probe boundary, and it ends the run.

use serde::Serialize;
use thiserror::Error;

/// Probe step that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStep {
    Diff,
    Branch,
    LastCommit,
}

impl std::fmt::Display for ProbeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProbeStep::Diff => "diff",
            ProbeStep::Branch => "branch",
            ProbeStep::LastCommit => "log",
        };
        f.write_str(name)
    }
}

/// Error recorded on a single repository's row
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepoError {
    #[error("{step} failed: {message}")]
    Probe { step: ProbeStep, message: String },

    #[error("Remote branch does not exist")]
    SyncMissingRef,

    #[error("{message}")]
    SyncTransient { message: String },

    #[error("probe task failed: {message}")]
    TaskFailed { message: String },
}

/// Systemic failure that aborts the whole run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FatalError {
    #[error("authentication failed while pulling {path}: {message}")]
    Authentication { path: String, message: String },
}
