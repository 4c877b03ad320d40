//! Statistics tracking for a status run

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::config::{ERROR_MESSAGE_MAX_LENGTH, ERROR_MESSAGE_TRUNCATE_LENGTH};
use super::report::ResultRow;

/// Counters updated by probe tasks as rows are published
///
/// Atomics keep the progress display lock-free; the report itself is built
/// from the rows, not from these counters.
#[derive(Debug, Default)]
pub struct RunStatistics {
    pub completed: AtomicU64,
    pub dirty: AtomicU64,
    pub updated: AtomicU64,
    pub failed: AtomicU64,
}

impl RunStatistics {
    /// Creates a new statistics tracker with all counters initialized to zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies an already collected set of rows
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a ResultRow>) -> Self {
        let stats = Self::new();
        for row in rows {
            stats.record(row);
        }
        stats
    }

    /// Updates the counters for one finished repository
    pub fn record(&self, row: &ResultRow) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        if row.is_dirty() {
            self.dirty.fetch_add(1, Ordering::Relaxed);
        }
        if row.was_synchronized {
            self.updated.fetch_add(1, Ordering::Relaxed);
        }
        if row.error.is_some() {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Short running tally for the progress bar
    pub fn progress_message(&self) -> String {
        format!(
            "{} modified • {} updated • {} failed",
            self.dirty.load(Ordering::Relaxed),
            self.updated.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed)
        )
    }

    /// Generates the one-line summary printed after the report
    pub fn generate_summary(&self, stale: usize, duration: Duration) -> String {
        let completed = self.completed.load(Ordering::Relaxed);
        let dirty = self.dirty.load(Ordering::Relaxed);
        let updated = self.updated.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);

        let mut summary = format!(
            "✅ Checked {} repos in {:.1}s • {} modified • {} updated",
            completed,
            duration.as_secs_f64(),
            dirty,
            updated
        );
        if failed > 0 {
            summary.push_str(&format!(" • {failed} failed"));
        }
        if stale > 0 {
            summary.push_str(&format!(" • {stale} stale"));
        }
        summary
    }
}

/// Cleans and formats error messages for display
pub(crate) fn clean_error_message(error: &str) -> String {
    // Replace newlines/tabs with spaces and collapse whitespace
    let cleaned = error
        .replace('\n', " ")
        .replace('\r', "")
        .replace('\t', " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let cleaned = cleaned.trim_start_matches("fatal: ").to_string();

    if cleaned.contains("timed out") {
        cleaned
    } else if cleaned.contains("conflict") || cleaned.contains("diverged") {
        "merge conflict".to_string()
    } else if cleaned.contains("no tracking information") {
        "no tracking branch".to_string()
    } else if cleaned.contains("Could not resolve host") || cleaned.contains("Connection") {
        "network error".to_string()
    } else if cleaned.chars().count() > ERROR_MESSAGE_MAX_LENGTH {
        // Truncate long messages
        let truncated: String = cleaned.chars().take(ERROR_MESSAGE_TRUNCATE_LENGTH).collect();
        format!("{truncated}...")
    } else {
        cleaned
    }
}
