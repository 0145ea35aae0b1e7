//! Pipeline stages for the upload-and-rewrite run.
//!
//! Each submodule implements exactly one transformation step and is tested
//! on its own; only [`upload`] performs I/O beyond reading the document.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ dedup ──▶ upload ──▶ remap ──▶ rewrite ──▶ output
//! (regex)    (by path)  (HTTP ×N)  (fan-out)  (per line)  (sibling file)
//! ```
//!
//! 1. [`extract`] - find Markdown and HTML image references with resolved
//!    paths and line indices
//! 2. [`dedup`]   - drop remote references, collapse shared paths to one
//!    upload unit each
//! 3. [`upload`]  - one concurrent HTTP request per unit; the only stage
//!    with network I/O
//! 4. [`remap`]   - expand per-path outcomes back across every original
//!    reference
//! 5. [`rewrite`] - substitute remote URLs line by line, at most once per line
//! 6. [`output`]  - persist the rewritten text next to the original

pub mod dedup;
pub mod extract;
pub mod output;
pub mod remap;
pub mod rewrite;
pub mod upload;
