//! Error types for the imglift library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`TaskError`]: **fatal for one file task**. The task cannot produce an
//!   output file at all (nothing to upload, malformed endpoint address,
//!   unreadable source file). Converted to an `aborted` event at the
//!   [`crate::task`] boundary; never propagated past the multi-file entry
//!   point.
//!
//! * [`UploadError`]: **non-fatal**. A single image upload failed (transport
//!   error, endpoint said no, empty result list) but other uploads for the
//!   same document are fine. Stored inside
//!   [`crate::pipeline::upload::UploadOutcome`] so the rewrite stage simply
//!   leaves the affected lines untouched rather than losing the whole
//!   document to one bad upload.
//!
//! A task only aborts when *nothing* useful can be written; individual
//! upload failures degrade to unmodified lines in an otherwise rewritten
//! output.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors a single file task can raise.
///
/// Per-upload failures use [`UploadError`] and are stored in
/// [`crate::pipeline::upload::UploadOutcome`] rather than propagated here.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The document contained no local image references to upload.
    #[error("no local image references found in '{path}'")]
    NoLocalImages { path: PathBuf },

    /// The configured upload endpoint is not a valid URL.
    #[error("upload endpoint address is invalid: '{endpoint}' ({detail})")]
    UploadAddressInvalid { endpoint: String, detail: String },

    /// The source document could not be read.
    #[error("failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the rewritten output file.
    #[error("failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TaskError {
    /// The stable kind reported through the sink's `aborted` event.
    pub fn kind(&self) -> TaskErrorKind {
        match self {
            TaskError::NoLocalImages { .. } => TaskErrorKind::NoLocalImages,
            TaskError::UploadAddressInvalid { .. } => TaskErrorKind::UploadAddressInvalid,
            _ => TaskErrorKind::UnknownError,
        }
    }
}

/// Stable error identifiers carried by `aborted` events.
///
/// These are wire-level strings consumed by whatever sits behind the
/// [`crate::report::TaskReporter`] sink, so their spelling must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskErrorKind {
    /// No eligible local references found; nothing to upload.
    NoLocalImages,
    /// Endpoint address malformed in a detectable way.
    UploadAddressInvalid,
    /// An individual upload failed for a classified reason.
    UploadFailed,
    /// Any other failure during the pipeline.
    UnknownError,
}

impl TaskErrorKind {
    /// The kebab-case identifier used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskErrorKind::NoLocalImages => "no-local-images",
            TaskErrorKind::UploadAddressInvalid => "upload-address-invalid",
            TaskErrorKind::UploadFailed => "upload-failed",
            TaskErrorKind::UnknownError => "unknown-error",
        }
    }
}

impl std::fmt::Display for TaskErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal error for a single image upload.
///
/// Stored alongside [`crate::pipeline::upload::UploadOutcome`] when a unit
/// fails. The overall task continues; lines referencing the failed image are
/// left unmodified by the rewrite stage.
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// The HTTP request itself failed (connection refused, timeout, …).
    #[error("upload request for '{path}' failed: {detail}")]
    RequestFailed { path: PathBuf, detail: String },

    /// The endpoint answered with a non-success HTTP status.
    #[error("upload endpoint returned HTTP {status} for '{path}'")]
    HttpStatus { path: PathBuf, status: u16 },

    /// The response body was not the expected JSON shape.
    #[error("upload response for '{path}' could not be decoded: {detail}")]
    BadResponse { path: PathBuf, detail: String },

    /// The endpoint processed the request but reported `success: false`.
    #[error("upload endpoint rejected '{path}'")]
    Rejected { path: PathBuf },

    /// The endpoint reported success but returned no URL.
    #[error("upload response for '{path}' contained no remote URL")]
    EmptyResult { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_strings_are_stable() {
        assert_eq!(TaskErrorKind::NoLocalImages.as_str(), "no-local-images");
        assert_eq!(
            TaskErrorKind::UploadAddressInvalid.as_str(),
            "upload-address-invalid"
        );
        assert_eq!(TaskErrorKind::UploadFailed.as_str(), "upload-failed");
        assert_eq!(TaskErrorKind::UnknownError.as_str(), "unknown-error");
    }

    #[test]
    fn kind_serialises_as_kebab_case() {
        let json = serde_json::to_string(&TaskErrorKind::NoLocalImages).unwrap();
        assert_eq!(json, "\"no-local-images\"");
    }

    #[test]
    fn io_errors_map_to_unknown() {
        let e = TaskError::ReadFailed {
            path: PathBuf::from("/tmp/doc.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(e.kind(), TaskErrorKind::UnknownError);
    }

    #[test]
    fn address_error_maps_to_its_kind() {
        let e = TaskError::UploadAddressInvalid {
            endpoint: "not a url".into(),
            detail: "relative URL without a base".into(),
        };
        assert_eq!(e.kind(), TaskErrorKind::UploadAddressInvalid);
        assert!(e.to_string().contains("not a url"));
    }

    #[test]
    fn upload_error_display() {
        let e = UploadError::Rejected {
            path: PathBuf::from("/img/x.png"),
        };
        assert!(e.to_string().contains("/img/x.png"));
    }
}
