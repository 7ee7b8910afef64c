//! Saving final reports as Markdown files.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;

const MAX_SLUG_CHARS: usize = 60;

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_-]").unwrap());

/// File-name stem derived from the question.
///
/// Lowercased words joined by `_`, keeping only `[a-z0-9_-]`, at most 60
/// characters. Falls back to `report` when nothing survives.
pub fn slugify(query: &str) -> String {
    let joined = query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();

    let slug: String = UNSAFE_CHARS
        .replace_all(&joined, "")
        .chars()
        .take(MAX_SLUG_CHARS)
        .collect();
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "report".to_string()
    } else {
        slug.to_string()
    }
}

/// Write `text` to `{dir}/{slug}_{YYYYmmdd_HHMMSS}.md`, creating `dir` if needed.
pub fn save_report(
    dir: &Path,
    query: &str,
    text: &str,
    timestamp: DateTime<Local>,
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let file_name = format!("{}_{}.md", slugify(query), timestamp.format("%Y%m%d_%H%M%S"));
    let path = dir.join(file_name);
    std::fs::write(&path, text)?;
    tracing::info!(path = %path.display(), "Report saved");
    Ok(path)
}
