//! Deduplication: collapse local references into one upload unit per path.
//!
//! Identity is the *resolved* path, not the spelling in the source text, so
//! `./img/x.png` in a Markdown line and `img/x.png` in an HTML tag become one
//! unit. Remote references are dropped entirely; they need no upload.

use crate::pipeline::extract::ImageReference;
use std::collections::HashMap;
use std::path::PathBuf;

/// One upload to perform: a distinct local path and every line that uses it.
#[derive(Debug, Clone)]
pub struct UploadUnit {
    pub absolute_path: PathBuf,
    /// Line indices of all references (both syntaxes) sharing this path.
    pub line_indices: Vec<usize>,
}

/// Group non-remote references by resolved path, preserving the order in
/// which each distinct path first appears.
pub fn collapse_local_references(references: &[ImageReference]) -> Vec<UploadUnit> {
    let mut units: Vec<UploadUnit> = Vec::new();
    let mut index_by_path: HashMap<&PathBuf, usize> = HashMap::new();

    for reference in references.iter().filter(|r| !r.is_remote) {
        match index_by_path.get(&reference.absolute_path) {
            Some(&i) => units[i].line_indices.push(reference.line_index),
            None => {
                index_by_path.insert(&reference.absolute_path, units.len());
                units.push(UploadUnit {
                    absolute_path: reference.absolute_path.clone(),
                    line_indices: vec![reference.line_index],
                });
            }
        }
    }

    units
}
