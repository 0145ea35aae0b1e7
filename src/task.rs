//! Task coordination: drive files through the pipeline and emit events.
//!
//! Per task the state machine is
//! `Started → (UploadProgress)* → Ended | Aborted`. The terminal event only
//! fires after every upload for that file has settled. Multiple tasks run
//! fully concurrently and independently: one task's failure never cancels
//! or affects another, and nothing escapes the multi-file entry point:
//! every failure becomes an `aborted` event and a log line.

use crate::config::UploadConfig;
use crate::error::TaskError;
use crate::pipeline::{dedup, extract, output, remap, rewrite, upload};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// One document to process. Created by the caller, consumed read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTask {
    /// Caller-chosen identifier echoed on every event for this task.
    pub id: String,
    /// Path of the source document.
    pub file_path: PathBuf,
    /// Display name used to derive the output filename.
    pub file_name: String,
}

/// Process every task concurrently. Returns nothing: outcomes arrive solely
/// through the reporting sink configured in `config`.
pub async fn process_files(tasks: &[FileTask], config: &UploadConfig) {
    futures::future::join_all(tasks.iter().map(|task| process_file(task, config))).await;
}

/// Run one task through the pipeline, converting any failure into an
/// `aborted` event at this boundary.
pub async fn process_file(task: &FileTask, config: &UploadConfig) {
    info!("task {}: starting {}", task.id, task.file_path.display());
    if let Some(ref reporter) = config.reporter {
        reporter.on_task_started(&task.id);
    }

    match run_pipeline(task, config).await {
        Ok(output_path) => {
            info!("task {}: ended, wrote {}", task.id, output_path.display());
            if let Some(ref reporter) = config.reporter {
                reporter.on_task_ended(&task.id, true, &output_path);
            }
        }
        Err(e) => {
            error!("task {}: aborted: {e}", task.id);
            if let Some(ref reporter) = config.reporter {
                reporter.on_task_aborted(&task.id, e.kind());
            }
        }
    }
}

/// The straight-line pipeline for one file; every stage's fatal error
/// propagates here and no further.
async fn run_pipeline(task: &FileTask, config: &UploadConfig) -> Result<PathBuf, TaskError> {
    let content = tokio::fs::read_to_string(&task.file_path)
        .await
        .map_err(|e| TaskError::ReadFailed {
            path: task.file_path.clone(),
            source: e,
        })?;

    let references = extract::extract_references(&content, &task.file_path);
    debug!("task {}: {} references extracted", task.id, references.len());

    let units = dedup::collapse_local_references(&references);
    if units.is_empty() {
        return Err(TaskError::NoLocalImages {
            path: task.file_path.clone(),
        });
    }
    debug!("task {}: {} distinct local images", task.id, units.len());

    let outcomes = upload::upload_units(&units, config, &task.id).await?;
    let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
    info!(
        "task {}: {}/{} uploads succeeded",
        task.id,
        succeeded,
        outcomes.len()
    );

    let replacements = remap::map_outcomes(&outcomes, &references);
    let rewritten = rewrite::rewrite_content(&content, &replacements);
    output::write_output(&rewritten, &task.file_path, &task.file_name).await
}

/// Convenience constructor deriving `file_name` from the path.
impl FileTask {
    pub fn new(id: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        let file_path = file_path.into();
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            id: id.into(),
            file_path,
            file_name,
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}
