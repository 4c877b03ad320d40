//! Public API for the core module.
//!
//! This module provides the stable public API for core functionality including:
//! - Repository discovery and filtering
//! - Per-repository probing and bounded-concurrency dispatch
//! - Result collection, ordering and visibility
//! - Statistics tracking
//! - Configuration utilities
//!
//! Internal implementation details are not exposed through this API.

// Configuration
pub use super::config::{
    default_root_directory, get_concurrency, stale_days, SortOrder, StatusConfig,
};
pub use super::config::{
    DEFAULT_CONCURRENT_LIMIT, DEFAULT_MAX_DEPTH, DEFAULT_STALE_DAYS, MAX_PULL_RETRIES,
};

// Discovery and filtering
pub use super::discovery::{scan_repos, RepoCandidate};
pub use super::filter::{filter_repos, FilterSpec};

// Probing and dispatch
pub use super::probe::{probe, synchronize_with_retry};
pub use super::runner::{order_by_size, run_all, RunReport};

// Results
pub use super::error::{FatalError, ProbeStep, RepoError};
pub use super::report::{
    collect, display_path, is_visible, partition_visible, sort_rows, ResultCollector, ResultRow,
};
pub use super::stats::RunStatistics;

// Terminal utilities (re-exported from utils)
pub use crate::utils::{set_terminal_title, set_terminal_title_and_flush};

// Internal helpers for command and git modules
pub(crate) use super::stats::clean_error_message;
