//! Version-control operations consumed by the repository probe

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Result of a pull, classified from git's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing new on the remote
    UpToDate,
    /// New commits were merged into the working tree
    Applied,
    /// The tracked remote branch no longer exists
    MissingRemoteRef,
    /// Credentials or transport are broken; will fail the same way everywhere
    AuthFailure(String),
    /// Anything else, including timeouts
    Failed(String),
}

/// Backend the probe talks to. [`GitCli`](super::GitCli) shells out to git;
/// tests substitute their own implementation.
#[async_trait]
pub trait VcsBackend: Send + Sync {
    /// Short description of modified files, empty when the working tree is clean
    async fn diff_summary(&self, path: &Path) -> Result<String>;

    /// Current branch name, or the commit id when HEAD is detached
    async fn current_branch(&self, path: &Path) -> Result<String>;

    /// Commit time of the most recent commit on the current branch
    async fn last_commit_time(&self, path: &Path) -> Result<DateTime<Utc>>;

    /// Pulls the current branch from its configured remote
    async fn synchronize(&self, path: &Path) -> SyncOutcome;
}
