//! Repository discovery

use dashmap::DashMap;
use ignore::{WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use super::config::{ESTIMATED_REPO_COUNT, MAX_WALKER_THREADS, REPO_MARKER};

/// A directory identified as the root of a git working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCandidate {
    pub path: PathBuf,
    /// Byte length of the repository index. Only used to start large
    /// repositories first.
    pub size_hint: u64,
}

impl RepoCandidate {
    pub fn new(path: impl Into<PathBuf>, size_hint: u64) -> Self {
        Self {
            path: path.into(),
            size_hint,
        }
    }
}

/// Returns the size of the repository marker inside `dir`, if there is one
fn marker_size(dir: &Path) -> Option<u64> {
    let marker = REPO_MARKER.iter().fold(dir.to_path_buf(), |p, part| p.join(part));
    std::fs::metadata(marker)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.len())
}

/// Finds repositories below `root`, at most `max_depth` directories deep
///
/// Direct children of `root` are depth 1. A directory holding the repository
/// marker is reported and never descended into, so nested repositories are not
/// found. Unreadable directories are logged and skipped. The returned order is
/// unspecified.
pub fn scan_repos(root: impl AsRef<Path>, max_depth: usize) -> Vec<RepoCandidate> {
    let root = root.as_ref();
    if max_depth == 0 {
        return Vec::new();
    }

    let found: Arc<DashMap<PathBuf, u64>> = Arc::new(DashMap::with_capacity(ESTIMATED_REPO_COUNT));
    let found_clone = Arc::clone(&found);

    let walker = WalkBuilder::new(root)
        .standard_filters(false) // .gitignore and hidden rules do not apply here
        .follow_links(false)
        .max_depth(Some(max_depth))
        .threads(num_cpus::get().min(MAX_WALKER_THREADS))
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return false;
            }
            if entry.file_name() == ".git" {
                return false;
            }

            match marker_size(entry.path()) {
                Some(size) => {
                    found_clone.insert(entry.path().to_path_buf(), size);
                    false
                }
                None => true,
            }
        })
        .build_parallel();

    walker.run(|| {
        Box::new(|result| {
            if let Err(err) = result {
                warn!("skipping unreadable directory: {err}");
            }
            WalkState::Continue
        })
    });

    let repos: Vec<RepoCandidate> = match Arc::try_unwrap(found) {
        Ok(map) => map
            .into_iter()
            .map(|(path, size)| RepoCandidate::new(path, size))
            .collect(),
        Err(shared) => shared
            .iter()
            .map(|r| RepoCandidate::new(r.key().clone(), *r.value()))
            .collect(),
    };

    debug!(root = %root.display(), count = repos.len(), "scan complete");
    repos
}
