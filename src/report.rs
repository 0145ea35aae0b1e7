//! Reporting-sink trait for per-task lifecycle events.
//!
//! Inject an [`Arc<dyn TaskReporter>`] via
//! [`crate::config::UploadConfigBuilder::reporter`] to receive real-time
//! events as each file task moves through the pipeline.
//!
//! Callers forward events to an IPC bridge, a WebSocket, a terminal progress
//! bar, or a test recorder. The trait is `Send + Sync` because uploads within
//! one task settle concurrently and tasks for several files run at the same
//! time.
//!
//! # Event order
//!
//! For one task, `on_task_started` fires exactly once, followed by zero or
//! more `on_upload_progress` calls and exactly one of `on_task_ended` /
//! `on_task_aborted`. Progress events arrive in whatever order uploads
//! complete, but `uploaded_count` is monotonically non-decreasing and reaches
//! `total_count` before the terminal event. Events for different tasks
//! interleave freely.

use crate::error::TaskErrorKind;
use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as a file task progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must protect shared mutable state
/// with appropriate synchronisation (`Mutex`, `AtomicUsize`); progress
/// events for one task can arrive from concurrently settling uploads.
pub trait TaskReporter: Send + Sync {
    /// Called once when the task enters the pipeline.
    fn on_task_started(&self, task_id: &str) {
        let _ = task_id;
    }

    /// Called after each upload settles, success or failure.
    ///
    /// # Arguments
    /// * `total_count`    - number of distinct local images to upload
    /// * `uploaded_count` - uploads settled so far (monotonic)
    fn on_upload_progress(&self, task_id: &str, total_count: usize, uploaded_count: usize) {
        let _ = (task_id, total_count, uploaded_count);
    }

    /// Called when the task fails; no output file was written.
    fn on_task_aborted(&self, task_id: &str, error: TaskErrorKind) {
        let _ = (task_id, error);
    }

    /// Called when the task completes and the rewritten file is on disk.
    ///
    /// `is_build` is true whenever an output path was produced.
    fn on_task_ended(&self, task_id: &str, is_build: bool, output_path: &Path) {
        let _ = (task_id, is_build, output_path);
    }
}

/// A no-op implementation for callers that don't need lifecycle events.
pub struct NoopTaskReporter;

impl TaskReporter for NoopTaskReporter {}

/// Convenience alias matching the type stored in [`crate::config::UploadConfig`].
pub type Reporter = Arc<dyn TaskReporter>;
