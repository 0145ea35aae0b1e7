//! Content rewriting: substitute remote URLs into the original lines.
//!
//! A single pass over the document's lines. For a line with a mapped URL the
//! Markdown rule is attempted first (re-matching the same anchored pattern
//! extraction used); only if it leaves the line unchanged is the HTML rule
//! tried. The moment either rule changes a line it is considered done, so at
//! most one substitution happens per line even when a line could
//! structurally match both rules.
//!
//! Lines without a mapped URL, or where the structural re-match fails,
//! pass through byte-identical. The output keeps the source's line
//! terminator style: `\r\n` if any instance appears in the input, else `\n`.

use crate::pipeline::extract::{split_lines, RE_MD_IMAGE};
use crate::pipeline::remap::ReplacementEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static RE_IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap());

static RE_SRC_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bsrc\s*=\s*(?:"[^"]+"|'[^']+'|[^\s>]+)"#).unwrap());

/// Apply the replacement table to the document and return the rewritten text.
pub fn rewrite_content(content: &str, replacements: &[ReplacementEntry]) -> String {
    let url_by_line: HashMap<usize, &str> = replacements
        .iter()
        .map(|e| (e.line_index, e.remote_url.as_str()))
        .collect();

    let rewritten: Vec<String> = split_lines(content)
        .enumerate()
        .map(|(index, line)| match url_by_line.get(&index) {
            Some(url) => rewrite_line(line, url),
            None => line.to_string(),
        })
        .collect();

    let terminator = if content.contains("\r\n") { "\r\n" } else { "\n" };
    rewritten.join(terminator)
}

/// Markdown rule first, HTML rule only if the line is still unchanged.
fn rewrite_line(line: &str, remote_url: &str) -> String {
    if let Some(new_line) = replace_markdown_image(line, remote_url) {
        if new_line != line {
            return new_line;
        }
    }
    if let Some(new_line) = replace_html_image(line, remote_url) {
        if new_line != line {
            return new_line;
        }
    }
    line.to_string()
}

/// Rebuild an anchored Markdown image line as `![alt](url "title")`,
/// omitting the title clause when the source carried none.
fn replace_markdown_image(line: &str, remote_url: &str) -> Option<String> {
    let caps = RE_MD_IMAGE.captures(line)?;
    let alt = &caps[1];
    let title = caps
        .get(3)
        .map(|t| format!(" \"{}\"", t.as_str()))
        .unwrap_or_default();
    Some(format!("![{alt}]({remote_url}{title})"))
}

/// Replace only the `src` attribute value of the first `<img>` tag on the
/// line, leaving every other attribute untouched.
fn replace_html_image(line: &str, remote_url: &str) -> Option<String> {
    let tag = RE_IMG_TAG.find(line)?;
    let src = RE_SRC_ATTR.find(&line[tag.start()..tag.end()])?;
    let start = tag.start() + src.start();
    let end = tag.start() + src.end();

    let mut out = String::with_capacity(line.len() + remote_url.len());
    out.push_str(&line[..start]);
    out.push_str("src=\"");
    out.push_str(remote_url);
    out.push('"');
    out.push_str(&line[end..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(line_index: usize, url: &str) -> ReplacementEntry {
        ReplacementEntry {
            line_index,
            remote_url: url.to_string(),
        }
    }

    #[test]
    fn markdown_line_is_rewritten() {
        let out = rewrite_content(
            "![alt](./img/x.png)",
            &[entry(0, "https://cdn/x.png")],
        );
        assert_eq!(out, "![alt](https://cdn/x.png)");
    }

    #[test]
    fn title_is_preserved_when_present() {
        let out = rewrite_content(
            "![fig](./img/x.png \"A caption\")",
            &[entry(0, "https://cdn/x.png")],
        );
        assert_eq!(out, "![fig](https://cdn/x.png \"A caption\")");
    }

    #[test]
    fn title_clause_is_omitted_when_absent() {
        let out = rewrite_content("![fig](./img/x.png)", &[entry(0, "https://cdn/x.png")]);
        assert!(!out.contains('"'));
    }

    #[test]
    fn html_src_is_replaced_and_other_attributes_kept() {
        let out = rewrite_content(
            "<img src='./img/x.png' alt=\"x\" style=\"width: 50%\">",
            &[entry(0, "https://cdn/x.png")],
        );
        assert_eq!(
            out,
            "<img src=\"https://cdn/x.png\" alt=\"x\" style=\"width: 50%\">"
        );
    }

    #[test]
    fn unmapped_lines_are_byte_identical() {
        let content = "prose\n![a](./x.png)\nmore   prose\t ";
        let out = rewrite_content(content, &[entry(1, "https://cdn/x.png")]);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[0], "prose");
        assert_eq!(lines[2], "more   prose\t ");
    }

    #[test]
    fn at_most_one_substitution_per_line() {
        // A line that opens with a Markdown image and also carries an img
        // tag: only the Markdown rule fires and the tag survives as written.
        let content = "![a](./x.png) <img src=\"./x.png\">";
        let out = rewrite_content(content, &[entry(0, "https://cdn/x.png")]);
        assert_eq!(out, "![a](https://cdn/x.png)");
    }

    #[test]
    fn crlf_terminator_style_is_preserved() {
        let content = "![a](./x.png)\r\nplain\r\n";
        let out = rewrite_content(content, &[entry(0, "https://cdn/x.png")]);
        assert_eq!(out, "![a](https://cdn/x.png)\r\nplain\r\n");
    }

    #[test]
    fn lf_only_input_stays_lf() {
        let content = "a\nb\n";
        let out = rewrite_content(content, &[]);
        assert_eq!(out, content);
    }

    #[test]
    fn structural_re_match_failure_passes_through() {
        // The map points at a line that holds neither syntax; nothing happens.
        let content = "text ![a](./img/y.png)";
        let out = rewrite_content(content, &[entry(0, "https://cdn/y.png")]);
        assert_eq!(out, content);
    }

    #[test]
    fn html_rule_used_when_markdown_rule_does_not_apply() {
        let content = "some prose <img alt='pic' src=\"./x.png\"> trailing";
        let out = rewrite_content(content, &[entry(0, "https://cdn/x.png")]);
        assert_eq!(
            out,
            "some prose <img alt='pic' src=\"https://cdn/x.png\"> trailing"
        );
    }
}
