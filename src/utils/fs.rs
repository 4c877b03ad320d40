//! Path and text helpers for display

use std::path::Path;

/// `path` relative to `root`, or the full path when it lies outside `root`
pub fn relative_path(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
        _ => path.display().to_string(),
    }
}

/// Keeps the first `max_chars` characters of `text`, appending `…` when anything was cut
pub fn truncate_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{kept}…")
}
