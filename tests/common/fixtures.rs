//! Test fixtures and builders

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::git::{create_test_commit, setup_git_repo};

/// A committed test repository with automatic cleanup
pub struct TestRepo {
    pub temp_dir: TempDir,
    pub name: String,
}

impl TestRepo {
    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create or overwrite a file in the repository
    pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.path().join(name);
        fs::write(&file_path, content)?;
        Ok(file_path)
    }
}

/// Builder for creating test repositories
pub struct TestRepoBuilder {
    name: String,
    with_commits: usize,
}

impl TestRepoBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            with_commits: 1,
        }
    }

    pub fn with_commits(mut self, count: usize) -> Self {
        self.with_commits = count;
        self
    }

    pub fn build(self) -> Result<TestRepo> {
        let temp_dir = TempDir::new()?;
        setup_git_repo(temp_dir.path())?;

        // Create initial commit
        create_test_commit(
            temp_dir.path(),
            "README.md",
            "# Test Repo",
            "Initial commit",
        )?;

        // Create additional commits if specified
        for i in 2..=self.with_commits {
            create_test_commit(
                temp_dir.path(),
                &format!("file{i}.txt"),
                &format!("Content {i}"),
                &format!("Commit {i}"),
            )?;
        }

        Ok(TestRepo {
            temp_dir,
            name: self.name,
        })
    }
}

/// Directory tree of marker-only repositories
///
/// Each repository is just `<dir>/.git/index` with a chosen size, which is all
/// discovery looks at. No git binary is needed.
pub struct FakeRepoTree {
    pub root: TempDir,
}

impl FakeRepoTree {
    pub fn new() -> Result<Self> {
        Ok(Self {
            root: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Adds a repository at `relative` whose index file is `index_size` bytes
    pub fn repo(&self, relative: &str, index_size: usize) -> Result<PathBuf> {
        let repo = self.path().join(relative);
        fs::create_dir_all(repo.join(".git"))?;
        fs::write(repo.join(".git").join("index"), vec![0u8; index_size])?;
        Ok(repo)
    }

    /// Adds a plain directory with no repository marker
    pub fn dir(&self, relative: &str) -> Result<PathBuf> {
        let dir = self.path().join(relative);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}
