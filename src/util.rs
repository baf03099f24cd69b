use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory holding config and session files (`~/.report-console`).
pub fn console_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".report-console"))
}

/// Write `content` to `path` via a sibling temp file and rename, so readers
/// never observe a half-written file.
pub fn atomic_write_str(path: &Path, content: &str) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    std::fs::rename(&tmp, path)
}

/// Shorten `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
