//! Configuration for the upload-and-rewrite pipeline.
//!
//! All behaviour is controlled through [`UploadConfig`], built via its
//! [`UploadConfigBuilder`]. One config is shared across every concurrently
//! running file task.

use crate::error::TaskError;
use crate::report::Reporter;
use std::fmt;

/// Default endpoint of the local image-hosting service.
///
/// This is the standard listen address of the PicGo upload server; the
/// original tooling this crate replaces talked to the same service.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:36677/upload";

/// Configuration for processing one or more Markdown files.
///
/// Built via [`UploadConfig::builder()`] or [`UploadConfig::default()`].
///
/// # Example
/// ```rust
/// use imglift::UploadConfig;
///
/// let config = UploadConfig::builder()
///     .endpoint("http://127.0.0.1:36677/upload")
///     .upload_timeout_secs(Some(15))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct UploadConfig {
    /// HTTP endpoint that receives `{"list": [path]}` upload requests.
    /// Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Per-upload timeout in seconds. Default: `Some(30)`.
    ///
    /// `None` disables the cap entirely; an upload that never resolves then
    /// stalls its file task indefinitely, so opt out only when the endpoint
    /// is trusted to answer. There is no retry; a timed-out upload is
    /// classified as failed and its lines are left unmodified.
    pub upload_timeout_secs: Option<u64>,

    /// Sink for lifecycle events. Default: `None` (no events emitted).
    pub reporter: Option<Reporter>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            upload_timeout_secs: Some(30),
            reporter: None,
        }
    }
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("endpoint", &self.endpoint)
            .field("upload_timeout_secs", &self.upload_timeout_secs)
            .field("reporter", &self.reporter.as_ref().map(|_| "<dyn TaskReporter>"))
            .finish()
    }
}

impl UploadConfig {
    /// Create a new builder for `UploadConfig`.
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`UploadConfig`].
#[derive(Debug)]
pub struct UploadConfigBuilder {
    config: UploadConfig,
}

impl UploadConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn upload_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.upload_timeout_secs = secs;
        self
    }

    pub fn reporter(mut self, reporter: Reporter) -> Self {
        self.config.reporter = Some(reporter);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// The endpoint URL itself is deliberately not parsed here: a malformed
    /// address must surface as an `aborted` event on the task it affects,
    /// not as a build-time panic in the caller.
    pub fn build(self) -> Result<UploadConfig, TaskError> {
        let c = &self.config;
        if c.endpoint.trim().is_empty() {
            return Err(TaskError::InvalidConfig(
                "upload endpoint must not be empty".into(),
            ));
        }
        if c.upload_timeout_secs == Some(0) {
            return Err(TaskError::InvalidConfig(
                "upload timeout must be ≥ 1 second (use None to disable)".into(),
            ));
        }
        Ok(self.config)
    }
}
