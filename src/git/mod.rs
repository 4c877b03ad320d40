pub mod backend;
pub mod operations;
pub mod status;

// Re-export commonly used items
pub use backend::{SyncOutcome, VcsBackend};
pub use operations::{
    classify_pull, last_line, parse_head, pull_outcome, run_git, summarize_diff_stat, GitCli,
};
pub use status::Status;
