//! Structural post-processing for generated WordprocessingML document bodies.
//!
//! An upstream document generator emits a mostly-complete `document.xml`
//! body plus lightweight markers where section boundaries belong. This crate
//! resolves those into schema-correct structural XML without parsing the
//! body into a tree: every operation is a flat-buffer text transform that
//! leaves untouched regions byte-identical. It provides:
//! - Relationship-identifier resolution for header/footer parts
//! - Locating anchor paragraphs by style
//! - Rendering section-properties fragments from a typed configuration
//! - Splicing section breaks into an existing paragraph stream
//! - Replacing the document's terminal section block
//! - Resolving deferred orientation markers, with landscape image auto-fit
//!
//! # Example
//!
//! ```rust
//! use docweave::{build_section_properties, replace_final_section_properties};
//! use docweave::{PageSize, SectionConfig};
//!
//! let config = SectionConfig {
//!     page_size: Some(PageSize { width: 11906, height: 16838, orientation: None }),
//!     ..Default::default()
//! };
//! let fragment = build_section_properties(&config);
//!
//! let body = "<w:p><w:r><w:t>text</w:t></w:r></w:p><w:sectPr/>".to_string();
//! let (body, changed) = replace_final_section_properties(body, &fragment);
//! assert!(changed);
//! assert!(body.ends_with(&fragment));
//! ```

pub mod diagnostics;
pub mod floats;
pub mod relationships;
pub mod scan;
pub mod section_props;
pub mod splice;

pub use diagnostics::{CaptureDiagnostics, Diagnostics, LogDiagnostics};
pub use floats::{resolve_section_markers, FloatResolverOptions, ImageBounds};
pub use relationships::{resolve_relationship_ids, RelationshipError};
pub use scan::find_paragraph_with_style;
pub use section_props::{
    build_section_properties, HeaderFooterRef, HeaderFooterRefType, Orientation, PageMargins,
    PageNumbering, PageSize, SectionConfig,
};
pub use splice::{insert_section_break, replace_final_section_properties};
