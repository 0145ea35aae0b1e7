//! Output persistence: write the rewritten document next to the original.
//!
//! The original file is never modified or deleted; the rewritten text goes
//! to a sibling whose name embeds the current Unix timestamp, so repeated
//! runs never clobber each other.

use crate::error::TaskError;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

/// Write `content` as `{base} - {unix_seconds}.{ext}` in the original file's
/// directory and return the new path.
pub async fn write_output(
    content: &str,
    file_path: &Path,
    file_name: &str,
) -> Result<PathBuf, TaskError> {
    let dir = file_path.parent().unwrap_or_else(|| Path::new(""));
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| TaskError::Internal(format!("system clock before Unix epoch: {e}")))?
        .as_secs();

    let output_path = dir.join(derive_output_name(file_name, timestamp));
    tokio::fs::write(&output_path, content)
        .await
        .map_err(|e| TaskError::OutputWriteFailed {
            path: output_path.clone(),
            source: e,
        })?;

    info!("wrote rewritten copy to {}", output_path.display());
    Ok(output_path)
}

/// Base and extension split on the LAST dot, so `report.v2.md` round-trips
/// as `report.v2 - {ts}.md`; a name with no dot gets no extension back.
fn derive_output_name(file_name: &str, timestamp: u64) -> String {
    match file_name.rsplit_once('.') {
        Some((base, ext)) => format!("{base} - {timestamp}.{ext}"),
        None => format!("{file_name} - {timestamp}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_embeds_timestamp() {
        assert_eq!(derive_output_name("notes.md", 1700000000), "notes - 1700000000.md");
    }

    #[test]
    fn multi_dot_name_keeps_full_base() {
        assert_eq!(
            derive_output_name("report.v2.md", 1700000000),
            "report.v2 - 1700000000.md"
        );
    }

    #[test]
    fn name_without_extension() {
        assert_eq!(derive_output_name("README", 42), "README - 42");
    }

    #[tokio::test]
    async fn writes_sibling_and_leaves_original_alone() {
        let dir = tempfile::tempdir().unwrap();
        let original = dir.path().join("doc.md");
        tokio::fs::write(&original, "original").await.unwrap();

        let out = write_output("rewritten", &original, "doc.md").await.unwrap();
        assert_eq!(out.parent().unwrap(), dir.path());
        assert_ne!(out, original);
        assert_eq!(tokio::fs::read_to_string(&out).await.unwrap(), "rewritten");
        assert_eq!(
            tokio::fs::read_to_string(&original).await.unwrap(),
            "original"
        );
    }

    #[tokio::test]
    async fn unwritable_directory_is_an_output_error() {
        let missing = Path::new("/definitely/not/a/dir/doc.md");
        let err = write_output("x", missing, "doc.md").await.unwrap_err();
        assert!(matches!(err, TaskError::OutputWriteFailed { .. }));
    }
}
