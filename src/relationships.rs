//! Relationship resolution for header and footer parts.
//!
//! A document part addresses its header/footer sub-parts through relationship
//! identifiers declared in the part's `.rels` XML. Section construction needs
//! those identifiers up front, so the resolver builds a complete lookup table
//! once per document, or fails as a whole when any expected part is missing.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

static RELATIONSHIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<Relationship\b[^>]*>").unwrap());
// Id and Target may appear in either attribute order, so they are extracted
// independently rather than with one positional pattern.
static ID_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bId="([^"]+)""#).unwrap());
static TARGET_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\bTarget="([^"]+)""#).unwrap());

/// Errors raised while resolving relationship identifiers.
#[derive(Debug, thiserror::Error)]
pub enum RelationshipError {
    /// One or more expected targets had no relationship element. A partial
    /// table would let section construction reference identifiers that do
    /// not exist, so resolution fails as a whole.
    #[error("relationship targets not found in relationships part: {0:?}")]
    MissingTargets(Vec<String>),
}

/// Builds the stem-to-identifier table from the relationships-part XML.
///
/// The stem of a target is its file name without extension ("header1.xml"
/// becomes "header1"). Every name in `expected` must resolve, or the call
/// returns [`RelationshipError::MissingTargets`] listing each missing one.
pub fn resolve_relationship_ids(
    rels_xml: &str,
    expected: &[&str],
) -> Result<HashMap<String, String>, RelationshipError> {
    let mut table = HashMap::new();
    for element in RELATIONSHIP_RE.find_iter(rels_xml) {
        let element = element.as_str();
        let id = match ID_ATTR_RE.captures(element) {
            Some(caps) => caps[1].to_string(),
            None => continue,
        };
        let target = match TARGET_ATTR_RE.captures(element) {
            Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(""),
            None => continue,
        };
        table.insert(stem(target).to_string(), id);
    }

    let missing: Vec<String> = expected
        .iter()
        .filter(|name| !table.contains_key(stem(name)))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RelationshipError::MissingTargets(missing));
    }
    Ok(table)
}

/// File name without directory prefix or extension.
fn stem(target: &str) -> &str {
    let name = target.rsplit('/').next().unwrap_or(target);
    match name.rsplit_once('.') {
        Some((base, _ext)) => base,
        None => name,
    }
}
