//! Span-finding primitives over a flat WordprocessingML buffer.
//!
//! The document body is treated as one in-memory text buffer; there is no
//! tree to mutate. These primitives locate paragraph boundaries by token
//! scanning and are shared by the splicing and marker-resolution
//! operations. All offsets are byte offsets into the buffer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Paragraph open token. A real open tag is this prefix followed by `>`,
/// a space, or `/`; bare prefix matching would also hit `<w:pPr`,
/// `<w:pStyle` and friends.
pub const PARA_OPEN: &str = "<w:p";

/// Paragraph close token.
pub const PARA_CLOSE: &str = "</w:p>";

static PARA_STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<w:pStyle w:val="([^"]*)""#).unwrap());

fn is_paragraph_open_at(buf: &str, pos: usize) -> bool {
    matches!(
        buf.as_bytes().get(pos + PARA_OPEN.len()),
        Some(b'>') | Some(b' ') | Some(b'/')
    )
}

/// Finds the next paragraph open token at or after `from`.
pub fn find_paragraph_open(buf: &str, from: usize) -> Option<usize> {
    let mut cursor = from;
    while let Some(rel) = buf[cursor..].find(PARA_OPEN) {
        let pos = cursor + rel;
        if is_paragraph_open_at(buf, pos) {
            return Some(pos);
        }
        cursor = pos + PARA_OPEN.len();
    }
    None
}

/// Finds the last paragraph open token at or before `limit`.
///
/// Enumerates forward from the buffer start; a backward anchored search
/// cannot distinguish `<w:p` from the longer property tags.
pub fn rfind_paragraph_open(buf: &str, limit: usize) -> Option<usize> {
    let mut found = None;
    let mut cursor = 0;
    while let Some(pos) = find_paragraph_open(buf, cursor) {
        if pos > limit {
            break;
        }
        found = Some(pos);
        cursor = pos + PARA_OPEN.len();
    }
    found
}

/// Finds the start of the next paragraph close token at or after `from`.
pub fn find_paragraph_close(buf: &str, from: usize) -> Option<usize> {
    buf[from..].find(PARA_CLOSE).map(|rel| from + rel)
}

/// Finds the start of the nearest paragraph close token that ends strictly
/// before `offset`.
///
/// Direct backward search first; if that misses, an exhaustive forward scan
/// collects the last close token before the offset.
pub fn rfind_paragraph_close_before(buf: &str, offset: usize) -> Option<usize> {
    let offset = offset.min(buf.len());
    if let Some(pos) = buf[..offset].rfind(PARA_CLOSE) {
        return Some(pos);
    }
    let mut found = None;
    let mut cursor = 0;
    while let Some(rel) = buf[cursor..].find(PARA_CLOSE) {
        let pos = cursor + rel;
        if pos + PARA_CLOSE.len() > offset {
            break;
        }
        found = Some(pos);
        cursor = pos + PARA_CLOSE.len();
    }
    found
}

/// Returns the offset one past the `>` that terminates the tag starting at
/// `open_start`, or `None` for a truncated tag.
pub fn open_tag_end(buf: &str, open_start: usize) -> Option<usize> {
    buf[open_start..].find('>').map(|rel| open_start + rel + 1)
}

/// Finds the first paragraph whose style is one of `styles`.
///
/// Returns the open-token offset of the first match in document order.
/// Returns `None` for an empty style set, when no paragraph matches, or
/// when an open token has no close token (malformed buffer).
pub fn find_paragraph_with_style(buf: &str, styles: &[&str]) -> Option<usize> {
    if styles.is_empty() {
        return None;
    }
    let mut cursor = 0;
    while let Some(open) = find_paragraph_open(buf, cursor) {
        // Self-closing empty paragraph carries no style
        if buf.as_bytes().get(open + PARA_OPEN.len()) == Some(&b'/') {
            cursor = open + PARA_OPEN.len();
            continue;
        }
        let close = find_paragraph_close(buf, open)?;
        let span = &buf[open..close];
        if let Some(caps) = PARA_STYLE_RE.captures(span) {
            let style = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            if styles.iter().any(|s| *s == style) {
                return Some(open);
            }
        }
        cursor = close + PARA_CLOSE.len();
    }
    None
}
