//! Configuration constants and settings

use std::path::PathBuf;
use std::time::Duration;

// Concurrency Configuration

/// Default number of repositories probed at the same time
pub const DEFAULT_CONCURRENT_LIMIT: usize = 10;

/// Default scan depth below the root directory
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Number of extra pull attempts after a transient failure
pub const MAX_PULL_RETRIES: u32 = 1;

/// Repositories whose last commit is older than this are reported as stale
pub const DEFAULT_STALE_DAYS: u64 = 180;

// Timeouts
pub const DIFF_TIMEOUT: Duration = Duration::from_secs(10);
pub const PULL_TIMEOUT: Duration = Duration::from_secs(10);
pub const GIT_OPERATION_TIMEOUT: Duration = Duration::from_secs(180);

// Discovery
/// File whose presence marks a directory as a repository root
pub const REPO_MARKER: &[&str] = &[".git", "index"];
pub const ESTIMATED_REPO_COUNT: usize = 50; // Pre-allocation hint for collections
pub const MAX_WALKER_THREADS: usize = 8;

// Display formatting constants
pub const BRANCH_DISPLAY_WIDTH: usize = 30;
pub const ERROR_MESSAGE_MAX_LENGTH: usize = 60;
pub const ERROR_MESSAGE_TRUNCATE_LENGTH: usize = 57;

// Progress bar configuration
pub const PROGRESS_TEMPLATE: &str = "{bar:60.cyan/blue} {pos}/{len} {wide_msg}";
pub const PROGRESS_CHARS: &str = "##-";

/// Ordering applied to the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Case-insensitive alphabetical by path
    Path,
    /// Oldest last commit first
    LastCommit,
}

/// Immutable run configuration, built once from the command line and shared
/// by reference with the scanner, the filter and every probe task.
#[derive(Debug, Clone)]
pub struct StatusConfig {
    pub root_directory: PathBuf,
    pub max_depth: usize,
    pub filter_expression: String,
    pub concurrency_limit: usize,
    pub enable_sync: bool,
    pub show_all: bool,
    pub stale_mode: bool,
    pub stale_after: Duration,
    pub short_paths: bool,
    pub max_retries: u32,
}

impl StatusConfig {
    /// Creates a configuration for `root_directory` with every other option at its default
    pub fn new(root_directory: impl Into<PathBuf>) -> Self {
        Self {
            root_directory: root_directory.into(),
            max_depth: DEFAULT_MAX_DEPTH,
            filter_expression: String::new(),
            concurrency_limit: DEFAULT_CONCURRENT_LIMIT,
            enable_sync: false,
            show_all: false,
            stale_mode: false,
            stale_after: stale_days(DEFAULT_STALE_DAYS),
            short_paths: false,
            max_retries: MAX_PULL_RETRIES,
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        if self.stale_mode {
            SortOrder::LastCommit
        } else {
            SortOrder::Path
        }
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self::new(default_root_directory())
    }
}

/// `$HOME/code`, or `./code` when no home directory is known
pub fn default_root_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("code")
}

/// Converts a day count to a threshold, saturating at `u64::MAX` seconds
pub fn stale_days(days: u64) -> Duration {
    Duration::from_secs(days.saturating_mul(24 * 60 * 60))
}

/// Determines the concurrency limit for repository probes
///
/// Priority order:
/// 1. --sequential flag → 1
/// 2. --jobs N flag → N (at least 1)
/// 3. Default → 10
pub fn get_concurrency(jobs: Option<usize>, sequential: bool) -> usize {
    if sequential {
        return 1;
    }

    match jobs {
        Some(n) => n.max(1),
        None => DEFAULT_CONCURRENT_LIMIT,
    }
}
