//! Splicing section properties into an existing paragraph stream.
//!
//! A mid-document section break lives in the paragraph properties of the
//! paragraph that *ends* the previous section, not the first paragraph of
//! the new one. The injector therefore walks backward from the offset where
//! the new section starts. The terminal replacer swaps only the last
//! top-level `<w:sectPr>` block, which describes the whole-body section.

use crate::diagnostics::Diagnostics;
use crate::scan::{self, PARA_CLOSE};

const PPR_CLOSE: &str = "</w:pPr>";
const SECT_PR_OPEN: &str = "<w:sectPr";
const SECT_PR_CLOSE: &str = "</w:sectPr>";

/// Inserts a section-properties fragment into the paragraph that ends the
/// section preceding `at`.
///
/// `at` is the offset of the paragraph that begins the new section. When the
/// previous paragraph already has a `</w:pPr>`, the fragment goes right
/// before it; otherwise a properties wrapper is synthesized after the
/// paragraph's open tag. Structural absences are fail-soft: a warning goes
/// to `diag` and the buffer comes back unchanged, never corrupted.
pub fn insert_section_break(
    body: String,
    at: usize,
    sect_pr: &str,
    diag: &dyn Diagnostics,
) -> String {
    let close = match scan::rfind_paragraph_close_before(&body, at) {
        Some(pos) => pos,
        None => {
            diag.warn("section break: no paragraph ends before the target offset, skipping");
            return body;
        }
    };
    let open = match scan::rfind_paragraph_open(&body, close) {
        Some(pos) => pos,
        None => {
            diag.warn("section break: paragraph close token without an open token, skipping");
            return body;
        }
    };
    let para_end = close + PARA_CLOSE.len();
    let span = &body[open..para_end];

    let (insert_at, fragment) = if let Some(rel) = span.find(PPR_CLOSE) {
        (open + rel, sect_pr.to_string())
    } else {
        let tag_end = match scan::open_tag_end(&body, open) {
            Some(end) if end <= para_end => end,
            _ => {
                diag.warn("section break: paragraph open tag has no terminator, skipping");
                return body;
            }
        };
        (tag_end, format!("<w:pPr>{}</w:pPr>", sect_pr))
    };

    let mut out = String::with_capacity(body.len() + fragment.len());
    out.push_str(&body[..insert_at]);
    out.push_str(&fragment);
    out.push_str(&body[insert_at..]);
    diag.debug("section break inserted into preceding paragraph");
    out
}

/// Replaces the last top-level section-properties block with `sect_pr`.
///
/// A body carries one `<w:sectPr>` per internal boundary plus one trailing
/// block for the final section; only the trailing block is replaced. Every
/// open-tag occurrence is enumerated and only the last kept, since shortest
/// match scanning across several same-named blocks is unreliable. Returns
/// the buffer and whether a replacement occurred.
pub fn replace_final_section_properties(body: String, sect_pr: &str) -> (String, bool) {
    let mut last_open = None;
    let mut cursor = 0;
    while let Some(rel) = body[cursor..].find(SECT_PR_OPEN) {
        let pos = cursor + rel;
        if matches!(
            body.as_bytes().get(pos + SECT_PR_OPEN.len()),
            Some(b'>') | Some(b' ') | Some(b'/')
        ) {
            last_open = Some(pos);
        }
        cursor = pos + SECT_PR_OPEN.len();
    }
    let open = match last_open {
        Some(pos) => pos,
        None => return (body, false),
    };

    let tag_end = match scan::open_tag_end(&body, open) {
        Some(end) => end,
        None => return (body, false),
    };
    let end = if body[open..tag_end].ends_with("/>") {
        // Self-closing placeholder block
        tag_end
    } else {
        match body[tag_end..].find(SECT_PR_CLOSE) {
            Some(rel) => tag_end + rel + SECT_PR_CLOSE.len(),
            None => return (body, false),
        }
    };

    let mut out = String::with_capacity(body.len() - (end - open) + sect_pr.len());
    out.push_str(&body[..open]);
    out.push_str(sect_pr);
    out.push_str(&body[end..]);
    (out, true)
}
