//! Repository status enumeration and utilities

/// Headline state of a repository row, most urgent first
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Probing or pulling failed
    Error,
    /// Working tree has uncommitted modifications
    Modified,
    /// A pull brought in new commits
    Updated,
    /// Checked out on something other than main/master
    OffMain,
    /// Nothing to report
    Clean,
}

impl Status {
    /// Returns the emoji symbol for this status
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Clean | Status::Updated => "🟢",
            Status::OffMain => "🟡",
            Status::Modified => "🟠",
            Status::Error => "🔴",
        }
    }

    /// Returns the text representation of this status
    pub fn text(&self) -> &'static str {
        match self {
            Status::Error => "failed",
            Status::Modified => "modified",
            Status::Updated => "updated",
            Status::OffMain => "branch",
            Status::Clean => "clean",
        }
    }
}
