//! # imglift
//!
//! Upload local images referenced in a Markdown document to an image-hosting
//! endpoint and write a rewritten sibling copy pointing at the remote URLs.
//!
//! ## Why this crate?
//!
//! Markdown written locally links images by relative path. The moment the
//! document leaves the machine (a blog post, an issue, a wiki page) those
//! links break. imglift finds every locally-referenced image (Markdown
//! syntax and embedded `<img>` tags), pushes each distinct file once to a
//! PicGo-compatible upload endpoint, and rewrites the references line by
//! line, leaving the original file untouched.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document.md
//!  │
//!  ├─ 1. Extract  find image references (Markdown pass, then HTML pass)
//!  ├─ 2. Dedup    drop remote refs, one upload unit per distinct path
//!  ├─ 3. Upload   concurrent POSTs to the hosting endpoint, with progress
//!  ├─ 4. Remap    fan successful results back across every occurrence
//!  ├─ 5. Rewrite  substitute per line, Markdown rule before HTML rule
//!  └─ 6. Persist  write "document - {timestamp}.md" next to the original
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imglift::{process_files, FileTask, UploadConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UploadConfig::default(); // PicGo on 127.0.0.1:36677
//!     let tasks = vec![FileTask::new("post-1", "blog/post.md")];
//!     // Outcomes arrive via the reporter configured on `config`;
//!     // a failed file never affects the others.
//!     process_files(&tasks, &config).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `imglift` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! imglift = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod task;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{UploadConfig, UploadConfigBuilder, DEFAULT_ENDPOINT};
pub use error::{TaskError, TaskErrorKind, UploadError};
pub use report::{NoopTaskReporter, Reporter, TaskReporter};
pub use task::{process_file, process_files, FileTask};
