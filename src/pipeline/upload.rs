//! Upload orchestration: one HTTP request per unit, all in flight at once.
//!
//! ## Wire contract
//!
//! The endpoint is a local image-hosting service (PicGo-compatible):
//! request `POST {"list": ["<absolute path>"]}`, response
//! `{"success": bool, "result": ["<url>", …]}`. The first element of
//! `result` is the remote URL for the listed path.
//!
//! ## Failure classification
//!
//! A malformed endpoint address is the only fatal case; it is detected
//! before any request is sent and aborts the whole task. Every other failure
//! (transport error, timeout, non-2xx status, undecodable body,
//! `success: false`, empty `result`) is classified into a per-unit
//! [`UploadError`] on the outcome so downstream stages can tell *why* a line
//! was left unmodified instead of seeing an indistinct absent result.
//!
//! ## Progress
//!
//! After each unit settles (success or failure) an atomically incremented
//! completed count is reported through the sink. Completion order across
//! units is unspecified; the count itself is monotonic.

use crate::config::UploadConfig;
use crate::error::{TaskError, UploadError};
use crate::pipeline::dedup::UploadUnit;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Request body sent to the upload endpoint.
#[derive(Debug, Serialize)]
struct UploadRequest {
    list: Vec<String>,
}

/// Response body returned by the upload endpoint.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    success: bool,
    #[serde(default)]
    result: Vec<String>,
}

/// The settled result of one unit's upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub unit: UploadUnit,
    /// First URL of the response's `result` array; `None` on any failure.
    pub remote_url: Option<String>,
    pub error: Option<UploadError>,
}

impl UploadOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Upload every unit concurrently with no bound and return the outcomes.
///
/// The returned order matches `units`; *completion* order is whatever the
/// network produces. Progress events fire per settled unit via the sink in
/// `config`, tagged with `task_id`.
///
/// # Errors
/// Only [`TaskError::UploadAddressInvalid`] (endpoint fails to parse as a
/// URL, checked before any network activity) and internal client-construction
/// failures are fatal; per-unit failures land in the outcomes.
pub async fn upload_units(
    units: &[UploadUnit],
    config: &UploadConfig,
    task_id: &str,
) -> Result<Vec<UploadOutcome>, TaskError> {
    let endpoint = reqwest::Url::parse(&config.endpoint).map_err(|e| {
        TaskError::UploadAddressInvalid {
            endpoint: config.endpoint.clone(),
            detail: e.to_string(),
        }
    })?;

    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.upload_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder
        .build()
        .map_err(|e| TaskError::Internal(format!("failed to build HTTP client: {e}")))?;

    let total = units.len();
    let completed = AtomicUsize::new(0);
    debug!("dispatching {total} uploads to {endpoint}");

    let outcomes = futures::future::join_all(units.iter().map(|unit| {
        let client = &client;
        let endpoint = &endpoint;
        let completed = &completed;
        async move {
            let outcome = upload_single(client, endpoint, unit).await;
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
            match &outcome.error {
                None => debug!(
                    "upload {done}/{total} ok: {} -> {}",
                    unit.absolute_path.display(),
                    outcome.remote_url.as_deref().unwrap_or("")
                ),
                Some(e) => warn!("upload {done}/{total} failed: {e}"),
            }
            if let Some(ref reporter) = config.reporter {
                reporter.on_upload_progress(task_id, total, done);
            }
            outcome
        }
    }))
    .await;

    Ok(outcomes)
}

/// Send one unit's path to the endpoint and classify the result.
async fn upload_single(
    client: &reqwest::Client,
    endpoint: &reqwest::Url,
    unit: &UploadUnit,
) -> UploadOutcome {
    let path = &unit.absolute_path;
    let body = UploadRequest {
        list: vec![path.to_string_lossy().into_owned()],
    };

    let response = match client.post(endpoint.clone()).json(&body).send().await {
        Ok(r) => r,
        Err(e) => {
            return failed(
                unit,
                UploadError::RequestFailed {
                    path: path.clone(),
                    detail: e.to_string(),
                },
            )
        }
    };

    if !response.status().is_success() {
        return failed(
            unit,
            UploadError::HttpStatus {
                path: path.clone(),
                status: response.status().as_u16(),
            },
        );
    }

    let parsed: UploadResponse = match response.json().await {
        Ok(p) => p,
        Err(e) => {
            return failed(
                unit,
                UploadError::BadResponse {
                    path: path.clone(),
                    detail: e.to_string(),
                },
            )
        }
    };

    if !parsed.success {
        return failed(unit, UploadError::Rejected { path: path.clone() });
    }

    match parsed.result.into_iter().next() {
        Some(url) => UploadOutcome {
            unit: unit.clone(),
            remote_url: Some(url),
            error: None,
        },
        None => failed(unit, UploadError::EmptyResult { path: path.clone() }),
    }
}

fn failed(unit: &UploadUnit, error: UploadError) -> UploadOutcome {
    UploadOutcome {
        unit: unit.clone(),
        remote_url: None,
        error: Some(error),
    }
}
