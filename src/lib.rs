//! # gitstatus
//!
//! `gitstatus` finds every git repository below a root directory, inspects
//! each one concurrently and reports the ones that need attention. It powers
//! the `gitstatus` CLI tool.
//!
//! ## Core Features
//!
//! - **Fast Discovery**: Parallel, depth-bounded scanning using `ignore`.
//! - **Filtering**: Comma-separated substring includes and `!` excludes.
//! - **Concurrent Probing**: Diff, branch and last-commit checks across
//!   hundreds of repositories with a bounded worker pool.
//! - **Optional Pull**: Clean repositories can be pulled, with one retry on
//!   transient failures and an immediate stop on authentication failures.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gitstatus::core::{filter_repos, scan_repos, FilterSpec};
//!
//! let repos = scan_repos("/home/me/code", 2);
//! for repo in filter_repos(repos, &FilterSpec::parse("api,!archive")) {
//!     println!("{}", repo.path.display());
//! }
//! ```

pub mod commands;
pub mod core;
pub mod git;
pub mod utils;
