//! Reference extraction: locate image references in Markdown and HTML.
//!
//! Two passes over the document, concatenated in order: the Markdown pass
//! first (line-by-line), then the HTML pass (whole text). Both resolve the
//! reference URL against the document's directory and classify it as remote
//! when it carries an `http(s)://` scheme.
//!
//! The Markdown pattern is anchored at the start of the line: an image that
//! appears after other text on the same line is not detected. The rewrite
//! stage re-matches the same pattern, so extraction and substitution always
//! agree on what counts as an image line.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

/// Which syntax produced a reference; decides the rewrite rule for its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Markdown,
    Html,
}

/// One image reference found in the document.
#[derive(Debug, Clone)]
pub struct ImageReference {
    /// Filesystem path resolved against the document's directory.
    /// Only meaningful when `is_remote` is false.
    pub absolute_path: PathBuf,
    /// The reference exactly as written in the source text.
    pub raw_url: String,
    /// Zero-based index into the document split on line terminators.
    /// Stable for the lifetime of one pipeline run.
    pub line_index: usize,
    /// True when `raw_url` carries an `http(s)://` scheme.
    pub is_remote: bool,
    pub kind: ReferenceKind,
}

/// Anchored Markdown image pattern: `![alt](url "optional title")`.
///
/// The URL charset excludes whitespace and quotes so the optional title is
/// captured separately; parenthesised path segments like `a(1).png` are
/// allowed through the alternation. Shared with the rewrite stage.
pub(crate) static RE_MD_IMAGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^!\[([^\]]*)\]\(\s*((?:[^()\s"]|\([^)]*\))*)\s*(?:"([^"]*)")?\s*\)"#).unwrap()
});

/// `<img …>` tag with a required `src` and optional `alt`/`style`.
///
/// `alt` and `style` are captured but unused downstream; keeping them in the
/// pattern anchors matching across attribute orderings the same way on both
/// extraction and inspection.
static RE_HTML_IMG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)<img\b[^>]*\bsrc\s*=\s*(?:"([^"]+)"|'([^']+)'|([^\s>]+))(?:[^>]*\balt\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?(?:[^>]*\bstyle\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+)))?[^>]*>"#,
    )
    .unwrap()
});

/// Extract all image references from the document, Markdown pass first.
pub fn extract_references(content: &str, file_path: &Path) -> Vec<ImageReference> {
    let dir = file_path.parent().unwrap_or_else(|| Path::new(""));
    let mut refs = extract_markdown(content, dir);
    refs.extend(extract_html(content, dir));
    refs
}

/// Markdown pass: one anchored match attempt per line.
fn extract_markdown(content: &str, dir: &Path) -> Vec<ImageReference> {
    split_lines(content)
        .enumerate()
        .filter_map(|(index, line)| {
            let caps = RE_MD_IMAGE.captures(line)?;
            let url = caps.get(2).map_or("", |m| m.as_str());
            Some(make_reference(url, index, dir, ReferenceKind::Markdown))
        })
        .collect()
}

/// HTML pass: scan the whole text, deriving each match's line index from the
/// number of line terminators preceding its offset.
fn extract_html(content: &str, dir: &Path) -> Vec<ImageReference> {
    RE_HTML_IMG
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let src = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))?
                .as_str();
            let line_index = content[..whole.start()]
                .bytes()
                .filter(|&b| b == b'\n')
                .count();
            Some(make_reference(src, line_index, dir, ReferenceKind::Html))
        })
        .collect()
}

fn make_reference(url: &str, line_index: usize, dir: &Path, kind: ReferenceKind) -> ImageReference {
    let is_remote = is_remote_url(url);
    let absolute_path = if is_remote {
        PathBuf::from(url)
    } else {
        resolve_against(dir, url)
    };
    ImageReference {
        absolute_path,
        raw_url: url.to_string(),
        line_index,
        is_remote,
        kind,
    }
}

/// Split on `\r\n` or `\n`, matching how line indices are assigned everywhere
/// in the pipeline. Not `str::lines`: that drops the empty segment after a
/// trailing newline, which the rewrite stage needs to rejoin losslessly.
pub(crate) fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

/// Case-insensitive `http://` / `https://` prefix test.
pub(crate) fn is_remote_url(url: &str) -> bool {
    url.get(..7).is_some_and(|s| s.eq_ignore_ascii_case("http://"))
        || url.get(..8).is_some_and(|s| s.eq_ignore_ascii_case("https://"))
}

/// Resolve `url` against `dir`, normalising `.` and `..` lexically so the
/// same file referenced as `./img/x.png` and `img/x.png` deduplicates to one
/// path. No filesystem access: the file need not exist at extraction time.
fn resolve_against(dir: &Path, url: &str) -> PathBuf {
    let raw = Path::new(url);
    let joined = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        dir.join(raw)
    };

    let mut out = PathBuf::new();
    for comp in joined.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !joined.is_absolute() {
                    out.push("..");
                }
            }
            c => out.push(c.as_os_str()),
        }
    }
    out
}
