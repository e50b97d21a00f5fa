//! Atomic file writes
//!
//! Results files are replaced wholesale on every save. Writing goes through
//! a temporary file in the target directory which is fsynced and then
//! renamed over the destination, so readers observe either the previous
//! document or the new one and never a truncated file.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Serialize;
use std::io::Write;

use tempfile::NamedTempFile;

/// Atomically write `content` to `path` using temp file + fsync + rename.
///
/// The parent directory must already exist.
pub fn write_file_atomic(path: &Utf8Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    let mut temp_file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in: {dir}"))?;

    temp_file
        .write_all(content)
        .context("Failed to write content to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to fsync temporary file")?;

    temp_file
        .persist(path.as_std_path())
        .map_err(|e| anyhow::anyhow!(e.error))
        .with_context(|| format!("Failed to atomically replace: {path}"))?;

    Ok(())
}

/// Render `value` as JSON with 2-space indentation and a trailing newline.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut rendered = serde_json::to_string_pretty(value)?;
    rendered.push('\n');
    Ok(rendered)
}
