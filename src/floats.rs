//! Deferred section-marker resolution and landscape image auto-fit.
//!
//! The upstream generator cannot know final page geometry while emitting the
//! body, so it leaves comment markers of the form `<!-- section:landscape -->`
//! (any orientation word is accepted), each immediately followed by a
//! paragraph holding a placeholder `<w:sectPr>` block. The resolver replaces
//! each marker-plus-placeholder span with a full section break built by a
//! caller-supplied callback, and optionally enlarges the image preceding a
//! landscape marker to fill the configured content area.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::Diagnostics;
use crate::scan::{self, PARA_CLOSE};

static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*section:([A-Za-z]+)\s*-->").unwrap());
// cx and cy are extracted independently; attribute order is not guaranteed
static CX_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bcx="(\d+)""#).unwrap());
static CY_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bcy="(\d+)""#).unwrap());

const ENVELOPE_EXTENT: &str = "<wp:extent";
const GRAPHIC_EXTENT: &str = "<a:ext ";
const LANDSCAPE: &str = "landscape";

/// Maximum image dimensions in EMUs for landscape auto-fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    pub width: u64,
    pub height: u64,
}

/// Tuning for the marker resolver.
#[derive(Debug, Clone, Copy)]
pub struct FloatResolverOptions {
    /// Upscale images near landscape markers to fit inside these bounds;
    /// `None` disables the scaling pass entirely.
    pub image_bounds: Option<ImageBounds>,
    /// Backward window, in bytes, when locating the image belonging to a
    /// landscape marker. Bounded so the search never wanders into an
    /// earlier section's drawings.
    pub lookbehind: usize,
    /// Forward window, in bytes, from a drawing envelope to its nested
    /// graphics-extent copy.
    pub lookahead: usize,
}

impl Default for FloatResolverOptions {
    fn default() -> Self {
        FloatResolverOptions {
            image_bounds: None,
            lookbehind: 4096,
            lookahead: 1024,
        }
    }
}

impl FloatResolverOptions {
    pub fn with_image_bounds(bounds: ImageBounds) -> Self {
        FloatResolverOptions {
            image_bounds: Some(bounds),
            ..Default::default()
        }
    }
}

/// Resolves every deferred section marker in `body`.
///
/// `build` maps a marker's orientation word to a complete `<w:sectPr>`
/// fragment; the resolver only decides *where* to splice it. Three ordered
/// passes: discover markers, conditionally upscale images behind landscape
/// markers, then rewrite each marker-plus-placeholder span. A buffer with
/// no markers comes back unchanged. No condition is fatal; skipped markers
/// and unparseable image pairs are counted and reported through `diag`.
pub fn resolve_section_markers<F>(
    body: String,
    build: F,
    options: FloatResolverOptions,
    diag: &dyn Diagnostics,
) -> String
where
    F: Fn(&str) -> String,
{
    // Pass 1: discovery
    let mut marker_count = 0usize;
    let mut landscape_offsets = Vec::new();
    for caps in MARKER_RE.captures_iter(&body) {
        marker_count += 1;
        if &caps[1] == LANDSCAPE {
            landscape_offsets.push(caps.get(0).map(|m| m.start()).unwrap_or(0));
        }
    }
    if marker_count == 0 {
        return body;
    }
    diag.debug(&format!(
        "found {} section markers ({} landscape)",
        marker_count,
        landscape_offsets.len()
    ));

    // Pass 2: conditional upscaling
    let mut body = body;
    if let Some(bounds) = options.image_bounds {
        if !landscape_offsets.is_empty() {
            body = upscale_marker_images(body, &landscape_offsets, bounds, &options, diag);
        }
    }

    // Pass 3: marker resolution. Markers are re-located by token search so
    // pass-2 rewrites cannot invalidate their identity.
    resolve_markers(body, &build, diag)
}

/// Enlarges the image nearest before each landscape marker to fit inside
/// `bounds`, preserving aspect ratio and never downscaling.
fn upscale_marker_images(
    mut body: String,
    landscape_offsets: &[usize],
    bounds: ImageBounds,
    options: &FloatResolverOptions,
    diag: &dyn Diagnostics,
) -> String {
    let mut scaled = 0usize;
    let mut skipped = 0usize;

    // Reverse offset order keeps earlier marker offsets valid across edits
    for &marker in landscape_offsets.iter().rev() {
        let mut window_start = marker.saturating_sub(options.lookbehind);
        while !body.is_char_boundary(window_start) {
            window_start += 1;
        }
        let envelope = match body[window_start..marker].rfind(ENVELOPE_EXTENT) {
            Some(rel) => window_start + rel,
            None => {
                skipped += 1;
                continue;
            }
        };
        let envelope_end = match scan::open_tag_end(&body, envelope) {
            Some(end) => end,
            None => {
                skipped += 1;
                continue;
            }
        };
        let (cx, cy) = match parse_extent_pair(&body[envelope..envelope_end]) {
            Some(pair) => pair,
            None => {
                skipped += 1;
                continue;
            }
        };

        // Fit-inside: independent ratios, keep the smaller, upscale only
        let scale = (bounds.width as f64 / cx as f64).min(bounds.height as f64 / cy as f64);
        if scale <= 1.0 {
            continue;
        }
        let new_cx = (cx as f64 * scale).floor() as u64;
        let new_cy = (cy as f64 * scale).floor() as u64;

        let mut window_end = (envelope_end + options.lookahead).min(body.len());
        while !body.is_char_boundary(window_end) {
            window_end -= 1;
        }
        let graphic = match body[envelope_end..window_end].find(GRAPHIC_EXTENT) {
            Some(rel) => envelope_end + rel,
            None => {
                skipped += 1;
                continue;
            }
        };
        let graphic_end = match scan::open_tag_end(&body, graphic) {
            Some(end) => end,
            None => {
                skipped += 1;
                continue;
            }
        };
        if parse_extent_pair(&body[graphic..graphic_end]).is_none() {
            skipped += 1;
            continue;
        }

        // Rewrite the later copy first so the envelope span stays valid;
        // both copies must end up numerically identical
        let new_graphic = rewrite_extent_pair(&body[graphic..graphic_end], new_cx, new_cy);
        let new_envelope = rewrite_extent_pair(&body[envelope..envelope_end], new_cx, new_cy);
        body.replace_range(graphic..graphic_end, &new_graphic);
        body.replace_range(envelope..envelope_end, &new_envelope);
        scaled += 1;
    }

    diag.debug(&format!("upscaled {} landscape images", scaled));
    if skipped > 0 {
        diag.warn(&format!(
            "{} landscape markers had no scalable image pair",
            skipped
        ));
    }
    body
}

fn parse_extent_pair(tag: &str) -> Option<(u64, u64)> {
    let cx = CX_ATTR_RE.captures(tag)?.get(1)?.as_str().parse::<u64>().ok()?;
    let cy = CY_ATTR_RE.captures(tag)?.get(1)?.as_str().parse::<u64>().ok()?;
    if cx == 0 || cy == 0 {
        return None;
    }
    Some((cx, cy))
}

fn rewrite_extent_pair(tag: &str, cx: u64, cy: u64) -> String {
    let cx_value = format!(r#"cx="{}""#, cx);
    let cy_value = format!(r#"cy="{}""#, cy);
    let replaced = CX_ATTR_RE.replace(tag, cx_value.as_str());
    CY_ATTR_RE.replace(&replaced, cy_value.as_str()).into_owned()
}

/// Replaces each marker and its placeholder paragraph with a paragraph
/// carrying the callback's fragment for the marker's orientation.
fn resolve_markers<F>(body: String, build: &F, diag: &dyn Diagnostics) -> String
where
    F: Fn(&str) -> String,
{
    struct Edit {
        start: usize,
        end: usize,
        replacement: String,
    }

    let mut edits: Vec<Edit> = Vec::new();
    let mut unresolved = 0usize;
    for caps in MARKER_RE.captures_iter(&body) {
        let marker = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let orientation = caps.get(1).map(|m| m.as_str()).unwrap_or("");

        // Resolution fires only on the exact expected shape: the marker is
        // immediately followed (whitespace allowed) by a paragraph holding
        // a placeholder section-properties block
        let mut after = marker.end();
        while body.as_bytes().get(after).is_some_and(|b| b.is_ascii_whitespace()) {
            after += 1;
        }
        if scan::find_paragraph_open(&body, after) != Some(after) {
            unresolved += 1;
            continue;
        }
        let close = match scan::find_paragraph_close(&body, after) {
            Some(pos) => pos,
            None => {
                unresolved += 1;
                continue;
            }
        };
        let para_end = close + PARA_CLOSE.len();
        if !body[after..para_end].contains("<w:sectPr") {
            unresolved += 1;
            continue;
        }

        edits.push(Edit {
            start: marker.start(),
            end: para_end,
            replacement: format!("<w:p><w:pPr>{}</w:pPr></w:p>", build(orientation)),
        });
    }

    diag.debug(&format!("resolving {} section markers", edits.len()));
    if unresolved > 0 {
        diag.warn(&format!(
            "{} section markers not followed by a placeholder paragraph, left as-is",
            unresolved
        ));
    }
    if edits.is_empty() {
        return body;
    }

    let mut out = body;
    for edit in edits.iter().rev() {
        out.replace_range(edit.start..edit.end, &edit.replacement);
    }
    out
}
