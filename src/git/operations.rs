//! Git command execution and output classification

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use super::backend::{SyncOutcome, VcsBackend};
use crate::core::clean_error_message;
use crate::core::config::{DIFF_TIMEOUT, GIT_OPERATION_TIMEOUT, PULL_TIMEOUT};

// Git command arguments
const GIT_DIFF_STAT_ARGS: &[&str] = &["diff", "--stat"];
const GIT_LOG_LAST_COMMIT_ARGS: &[&str] = &["log", "-1", "--format=%at"];
const GIT_PULL_ARGS: &[&str] = &["pull"];

const HEAD_REF_PREFIX: &str = "ref: refs/heads/";

// Pull output markers
const MISSING_REF_MARKER: &str = "but no such ref was fetched";
const UP_TO_DATE_MARKERS: &[&str] = &["Already up to date", "Already up-to-date", "is up to date"];
const APPLIED_MARKERS: &[&str] = &[
    "Updating",
    "Fast-forward",
    "changed",
    "Merge made by",
    "Successfully rebased",
];
const AUTH_FAILURE_MARKERS: &[&str] = &[
    "kex_exchange_identification",
    "permission denied (publickey",
    "host key verification failed",
    "authentication failed",
    "could not read username",
];

/// Runs a git command in the specified directory with the default timeout
/// Returns (success, stdout, stderr)
pub async fn run_git(path: &Path, args: &[&str]) -> Result<(bool, String, String)> {
    run_git_with_timeout(path, args, GIT_OPERATION_TIMEOUT).await
}

/// Runs a git command, killing it once `timeout` elapses
/// Returns (success, stdout, stderr)
pub async fn run_git_with_timeout(
    path: &Path,
    args: &[&str],
    timeout: Duration,
) -> Result<(bool, String, String)> {
    let result = tokio::time::timeout(
        timeout,
        Command::new("git")
            .args(args)
            .current_dir(path)
            .kill_on_drop(true)
            .output(),
    )
    .await;

    match result {
        Ok(Ok(output)) => Ok((
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(anyhow!(
            "git {} timed out after {} seconds",
            args.first().copied().unwrap_or_default(),
            timeout.as_secs()
        )),
    }
}

/// Returns the last non-empty line of `text`
pub fn last_line(text: &str) -> &str {
    text.trim_end_matches('\n').lines().last().unwrap_or("")
}

/// Reduces `git diff --stat` output to its file count, e.g. "3 files"
pub fn summarize_diff_stat(output: &str) -> String {
    let summary = last_line(output.trim());
    if summary.is_empty() {
        return String::new();
    }

    let first = summary.split(',').next().unwrap_or(summary).trim();
    first.trim_end_matches(" changed").to_string()
}

/// Extracts the branch name from the contents of `.git/HEAD`
/// A detached HEAD yields the commit id unchanged.
pub fn parse_head(contents: &str) -> String {
    let head = contents.trim();
    head.strip_prefix(HEAD_REF_PREFIX).unwrap_or(head).to_string()
}

fn is_auth_failure(message: &str) -> bool {
    let lower = message.to_lowercase();
    AUTH_FAILURE_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Classifies the result of `git pull`
pub fn classify_pull(success: bool, stdout: &str, stderr: &str) -> SyncOutcome {
    if stdout.contains(MISSING_REF_MARKER) || stderr.contains(MISSING_REF_MARKER) {
        return SyncOutcome::MissingRemoteRef;
    }

    if !success {
        if is_auth_failure(stderr) {
            return SyncOutcome::AuthFailure(last_line(stderr).to_string());
        }
        let detail = if stderr.is_empty() { stdout } else { stderr };
        return SyncOutcome::Failed(clean_error_message(detail));
    }

    if UP_TO_DATE_MARKERS.iter().any(|marker| stdout.contains(marker)) {
        return SyncOutcome::UpToDate;
    }
    if APPLIED_MARKERS.iter().any(|marker| stdout.contains(marker)) {
        SyncOutcome::Applied
    } else {
        SyncOutcome::UpToDate
    }
}

/// Maps the result of running `git pull` to a [`SyncOutcome`]
/// Spawn errors and timeouts are transient failures.
pub fn pull_outcome(result: Result<(bool, String, String)>) -> SyncOutcome {
    match result {
        Ok((success, stdout, stderr)) => classify_pull(success, &stdout, &stderr),
        Err(e) => SyncOutcome::Failed(clean_error_message(&e.to_string())),
    }
}

/// Backend that runs the git binary found on `PATH`
#[derive(Debug, Clone)]
pub struct GitCli {
    diff_timeout: Duration,
    pull_timeout: Duration,
}

impl GitCli {
    pub fn new() -> Self {
        Self::with_timeouts(DIFF_TIMEOUT, PULL_TIMEOUT)
    }

    pub fn with_timeouts(diff_timeout: Duration, pull_timeout: Duration) -> Self {
        Self {
            diff_timeout,
            pull_timeout,
        }
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VcsBackend for GitCli {
    async fn diff_summary(&self, path: &Path) -> Result<String> {
        let (success, stdout, stderr) =
            run_git_with_timeout(path, GIT_DIFF_STAT_ARGS, self.diff_timeout).await?;
        if !success {
            return Err(anyhow!(clean_error_message(&stderr)));
        }
        Ok(summarize_diff_stat(&stdout))
    }

    async fn current_branch(&self, path: &Path) -> Result<String> {
        let head_path = path.join(".git").join("HEAD");
        let contents = tokio::fs::read_to_string(&head_path)
            .await
            .with_context(|| format!("cannot read {}", head_path.display()))?;
        Ok(parse_head(&contents))
    }

    async fn last_commit_time(&self, path: &Path) -> Result<DateTime<Utc>> {
        let (success, stdout, stderr) = run_git(path, GIT_LOG_LAST_COMMIT_ARGS).await?;
        if !success {
            return Err(anyhow!(clean_error_message(&stderr)));
        }
        let seconds: i64 = stdout
            .trim()
            .parse()
            .with_context(|| format!("unexpected commit time {stdout:?}"))?;
        DateTime::<Utc>::from_timestamp(seconds, 0)
            .ok_or_else(|| anyhow!("commit time {seconds} out of range"))
    }

    async fn synchronize(&self, path: &Path) -> SyncOutcome {
        pull_outcome(run_git_with_timeout(path, GIT_PULL_ARGS, self.pull_timeout).await)
    }
}
