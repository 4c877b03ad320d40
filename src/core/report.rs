//! Result rows, their thread-safe collection, ordering and visibility

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::config::SortOrder;
use super::error::RepoError;
use crate::git::Status;

const MAIN_BRANCHES: &[&str] = &["main", "master"];

/// Outcome of probing one repository
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub path: PathBuf,
    pub branch: String,
    pub changed_summary: String,
    pub was_synchronized: bool,
    pub last_commit_time: Option<DateTime<Utc>>,
    pub error: Option<RepoError>,
}

impl ResultRow {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            branch: String::new(),
            changed_summary: String::new(),
            was_synchronized: false,
            last_commit_time: None,
            error: None,
        }
    }

    pub fn is_main(&self) -> bool {
        MAIN_BRANCHES.contains(&self.branch.as_str())
    }

    pub fn is_dirty(&self) -> bool {
        !self.changed_summary.is_empty()
    }

    /// True when the last commit is older than `threshold` at `now`
    /// Rows without a commit time are never stale.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        match self.last_commit_time {
            Some(time) => now
                .signed_duration_since(time)
                .to_std()
                .is_ok_and(|age| age > threshold),
            None => false,
        }
    }

    pub fn status(&self) -> Status {
        if self.error.is_some() {
            Status::Error
        } else if self.is_dirty() {
            Status::Modified
        } else if self.was_synchronized {
            Status::Updated
        } else if !self.is_main() {
            Status::OffMain
        } else {
            Status::Clean
        }
    }
}

/// Whether a row is worth showing
pub fn is_visible(row: &ResultRow, show_all: bool) -> bool {
    show_all || !row.is_main() || row.is_dirty() || row.was_synchronized || row.error.is_some()
}

/// Splits rows into the visible ones (order kept) and a count of hidden ones
pub fn partition_visible(rows: Vec<ResultRow>, show_all: bool) -> (Vec<ResultRow>, usize) {
    let total = rows.len();
    let visible: Vec<ResultRow> = rows
        .into_iter()
        .filter(|row| is_visible(row, show_all))
        .collect();
    let hidden = total - visible.len();
    (visible, hidden)
}

/// Append-only collection shared by every probe task
#[derive(Debug, Clone, Default)]
pub struct ResultCollector {
    rows: Arc<Mutex<Vec<ResultRow>>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, row: ResultRow) {
        self.rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes every published row out of the collection
    pub fn drain(&self) -> Vec<ResultRow> {
        std::mem::take(&mut *self.rows.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

fn compare_by_path(a: &ResultRow, b: &ResultRow) -> Ordering {
    path_key(&a.path).cmp(&path_key(&b.path))
}

/// Oldest first; rows without a commit time go last
fn compare_by_last_commit(a: &ResultRow, b: &ResultRow) -> Ordering {
    match (a.last_commit_time, b.last_commit_time) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| compare_by_path(a, b))
}

pub fn sort_rows(rows: &mut [ResultRow], order: SortOrder) {
    match order {
        SortOrder::Path => rows.par_sort_by(compare_by_path),
        SortOrder::LastCommit => rows.par_sort_by(compare_by_last_commit),
    }
}

/// Drains `collector` and returns its rows in report order
pub fn collect(collector: &ResultCollector, order: SortOrder) -> Vec<ResultRow> {
    let mut rows = collector.drain();
    sort_rows(&mut rows, order);
    rows
}

/// Path as it should be reported: relative to `root` when `short_paths` is set
pub fn display_path(path: &Path, root: &Path, short_paths: bool) -> String {
    if short_paths {
        crate::utils::relative_path(path, root)
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ProbeStep;
    use chrono::TimeZone;

    fn row(branch: &str, changes: &str) -> ResultRow {
        ResultRow {
            branch: branch.to_string(),
            changed_summary: changes.to_string(),
            ..ResultRow::new("/work/repo")
        }
    }

    #[test]
    fn test_is_main() {
        assert!(row("master", "").is_main());
        assert!(row("main", "").is_main());
        assert!(!row("feature/new-thing", "").is_main());
        assert!(!row("", "").is_main());
    }

    #[test]
    fn test_is_dirty() {
        assert!(!row("main", "").is_dirty());
        assert!(row("main", "3 files").is_dirty());
        assert!(row("main", "1 file").is_dirty());
    }

    #[test]
    fn test_visibility() {
        let clean = row("main", "");
        assert!(!is_visible(&clean, false));
        assert!(is_visible(&clean, true));

        assert!(is_visible(&row("feature/test", ""), false));
        assert!(is_visible(&row("main", "3 files"), false));

        let updated = ResultRow {
            was_synchronized: true,
            ..row("main", "")
        };
        assert!(is_visible(&updated, false));

        let failed = ResultRow {
            error: Some(RepoError::SyncMissingRef),
            ..row("main", "")
        };
        assert!(is_visible(&failed, false));
    }

    #[test]
    fn test_partition_counts_hidden() {
        let rows = vec![row("main", ""), row("dev", ""), row("master", "")];
        let (visible, hidden) = partition_visible(rows, false);
        assert_eq!(hidden, 2);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].branch, "dev");
    }

    #[test]
    fn test_status_precedence() {
        let failed = ResultRow {
            error: Some(RepoError::Probe {
                step: ProbeStep::Diff,
                message: "boom".to_string(),
            }),
            ..row("dev", "2 files")
        };
        assert_eq!(failed.status(), Status::Error);
        assert_eq!(row("dev", "2 files").status(), Status::Modified);
        assert_eq!(row("dev", "").status(), Status::OffMain);
        assert_eq!(row("main", "").status(), Status::Clean);
    }

    #[test]
    fn test_sort_by_path_is_case_insensitive() {
        let mut rows: Vec<ResultRow> = ["/work/Zeta", "/work/alpha", "/work/Beta"]
            .into_iter()
            .map(ResultRow::new)
            .collect();
        sort_rows(&mut rows, SortOrder::Path);
        let paths: Vec<_> = rows.iter().map(|r| r.path.to_string_lossy().to_string()).collect();
        assert_eq!(paths, vec!["/work/alpha", "/work/Beta", "/work/Zeta"]);
    }

    #[test]
    fn test_sort_by_last_commit_oldest_first() {
        let at = |secs| Some(Utc.timestamp_opt(secs, 0).unwrap());
        let mut rows = vec![
            ResultRow { last_commit_time: at(300), ..ResultRow::new("/work/c") },
            ResultRow { last_commit_time: None, ..ResultRow::new("/work/a") },
            ResultRow { last_commit_time: at(100), ..ResultRow::new("/work/b") },
        ];
        sort_rows(&mut rows, SortOrder::LastCommit);
        let paths: Vec<_> = rows.iter().map(|r| r.path.to_string_lossy().to_string()).collect();
        assert_eq!(paths, vec!["/work/b", "/work/c", "/work/a"]);
    }

    #[test]
    fn test_is_stale() {
        let now = Utc.timestamp_opt(1_000_000_000, 0).unwrap();
        let threshold = Duration::from_secs(180 * 86_400);
        let old = ResultRow {
            last_commit_time: Some(now - chrono::Duration::days(200)),
            ..ResultRow::new("/work/old")
        };
        let fresh = ResultRow {
            last_commit_time: Some(now - chrono::Duration::days(3)),
            ..ResultRow::new("/work/fresh")
        };
        assert!(old.is_stale(now, threshold));
        assert!(!fresh.is_stale(now, threshold));
        assert!(!ResultRow::new("/work/unknown").is_stale(now, threshold));
    }

    #[test]
    fn test_collector_is_shared_across_threads() {
        let collector = ResultCollector::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let collector = collector.clone();
                std::thread::spawn(move || {
                    for j in 0..25 {
                        collector.publish(ResultRow::new(format!("/work/{i}-{j}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("publisher thread panicked");
        }

        assert_eq!(collector.len(), 200);
        let rows = collect(&collector, SortOrder::Path);
        assert_eq!(rows.len(), 200);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_display_path() {
        let root = Path::new("/work");
        let path = Path::new("/work/org/repo");
        assert_eq!(display_path(path, root, false), "/work/org/repo");
        assert_eq!(display_path(path, root, true), "org/repo");
    }
}
