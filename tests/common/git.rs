//! Git testing utilities

use anyhow::Result;
use std::path::Path;
use std::process::Command;

/// Runs git in `path` and returns trimmed stdout, failing on a non-zero exit
pub fn run_git_cmd(path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(path).output()?;

    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Sets up a git repository with user config on branch `main`
/// Returns Ok(()) on success, or an error if git is not available
pub fn setup_git_repo(path: &Path) -> Result<()> {
    // Initialize git repo
    let init_result = Command::new("git")
        .args(["init"])
        .current_dir(path)
        .output()?;

    if !init_result.status.success() {
        anyhow::bail!("Git not available - skipping test");
    }

    // Name the initial branch independently of the user's init.defaultBranch
    run_git_cmd(path, &["symbolic-ref", "HEAD", "refs/heads/main"])?;

    // Configure git user
    run_git_cmd(path, &["config", "user.name", "Test User"])?;
    run_git_cmd(path, &["config", "user.email", "test@example.com"])?;

    // Disable commit signing for tests
    run_git_cmd(path, &["config", "commit.gpgsign", "false"])?;

    Ok(())
}

/// Creates a test commit in the repository
pub fn create_test_commit(
    path: &Path,
    file_name: &str,
    content: &str,
    message: &str,
) -> Result<()> {
    // Write file
    std::fs::write(path.join(file_name), content)?;

    // Stage file
    run_git_cmd(path, &["add", file_name])?;

    // Commit
    run_git_cmd(path, &["commit", "-m", message])?;

    Ok(())
}

/// Creates multiple committed test repositories in a parent directory
pub fn create_multiple_repos(parent_dir: &Path, count: usize) -> Result<Vec<String>> {
    let mut repo_names = Vec::new();

    for i in 0..count {
        let repo_name = format!("test-repo-{}", i + 1);
        let repo_path = parent_dir.join(&repo_name);
        std::fs::create_dir(&repo_path)?;

        setup_git_repo(&repo_path)?;
        create_test_commit(
            &repo_path,
            "README.md",
            &format!("# Repo {}", i + 1),
            "Initial commit",
        )?;

        repo_names.push(repo_name);
    }

    Ok(repo_names)
}

/// Clones `upstream` into `dest` and configures the clone for committing
pub fn clone_repo(upstream: &Path, dest: &Path) -> Result<()> {
    let parent = dest.parent().unwrap_or(Path::new("."));
    let output = Command::new("git")
        .arg("clone")
        .arg(upstream)
        .arg(dest)
        .current_dir(parent)
        .output()?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to clone: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    run_git_cmd(dest, &["config", "user.name", "Test User"])?;
    run_git_cmd(dest, &["config", "user.email", "test@example.com"])?;
    run_git_cmd(dest, &["config", "commit.gpgsign", "false"])?;
    run_git_cmd(dest, &["config", "pull.rebase", "false"])?;

    Ok(())
}

/// Checks if git is available in the system
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
