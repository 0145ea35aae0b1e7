//! Result mapping: expand per-path upload outcomes back to per-line entries.
//!
//! Deduplication collapsed many textual occurrences into one upload; this
//! stage undoes that in two passes. First a path → remote-URL map is built
//! from the successful outcomes, then the map is expanded against the FULL
//! undeduplicated reference list: every non-remote reference whose path
//! uploaded successfully yields one entry at its own line index. A path that
//! appears on three lines, across either syntax, gets three entries
//! pointing at the same URL.
//!
//! Failed outcomes contribute nothing; their lines pass through the rewrite
//! stage untouched.

use crate::pipeline::extract::ImageReference;
use crate::pipeline::upload::UploadOutcome;
use std::collections::HashMap;
use std::path::Path;

/// One substitution to perform: which line, and the URL to put there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementEntry {
    pub line_index: usize,
    pub remote_url: String,
}

/// Build the replacement table from outcomes and the original references.
pub fn map_outcomes(
    outcomes: &[UploadOutcome],
    references: &[ImageReference],
) -> Vec<ReplacementEntry> {
    let mut url_by_path: HashMap<&Path, &str> = HashMap::new();
    for outcome in outcomes {
        if let Some(ref url) = outcome.remote_url {
            url_by_path
                .entry(outcome.unit.absolute_path.as_path())
                .or_insert(url.as_str());
        }
    }

    references
        .iter()
        .filter(|r| !r.is_remote)
        .filter_map(|r| {
            url_by_path
                .get(r.absolute_path.as_path())
                .map(|url| ReplacementEntry {
                    line_index: r.line_index,
                    remote_url: (*url).to_string(),
                })
        })
        .collect()
}
