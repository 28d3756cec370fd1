//! Section-properties configuration and rendering.
//!
//! A [`SectionConfig`] is an immutable value describing one section's layout:
//! header/footer references, page geometry, numbering, columns. The builder
//! renders it into a `<w:sectPr>` fragment with the child-element order the
//! WordprocessingML schema requires; consumers of the fragment are
//! order-sensitive, so the order never varies with how the value was built.

use serde::{Deserialize, Serialize};

/// Which pages of a section a header or footer reference applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderFooterRefType {
    Default,
    First,
    Even,
}

impl HeaderFooterRefType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderFooterRefType::Default => "default",
            HeaderFooterRefType::First => "first",
            HeaderFooterRefType::Even => "even",
        }
    }
}

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Reference to a header or footer part by relationship identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderFooterRef {
    pub ref_type: HeaderFooterRefType,
    pub rel_id: String,
}

impl HeaderFooterRef {
    pub fn new(ref_type: HeaderFooterRefType, rel_id: impl Into<String>) -> Self {
        HeaderFooterRef {
            ref_type,
            rel_id: rel_id.into(),
        }
    }
}

/// Page size in twips. The orientation attribute is emitted only when set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub orientation: Option<Orientation>,
}

/// Page margins in twips; each attribute is emitted only when present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageMargins {
    #[serde(default)]
    pub top: Option<i32>,
    #[serde(default)]
    pub right: Option<i32>,
    #[serde(default)]
    pub bottom: Option<i32>,
    #[serde(default)]
    pub left: Option<i32>,
    #[serde(default)]
    pub header: Option<i32>,
    #[serde(default)]
    pub footer: Option<i32>,
    #[serde(default)]
    pub gutter: Option<i32>,
}

/// Page-numbering scheme for a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNumbering {
    /// Number format value, e.g. "decimal" or "lowerRoman"
    pub format: String,
    /// Restart value; numbering continues from the previous section when absent
    #[serde(default)]
    pub start: Option<u32>,
}

/// Declarative description of one section's layout.
///
/// All fields are independently optional; absent fields emit nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionConfig {
    #[serde(default)]
    pub headers: Vec<HeaderFooterRef>,
    #[serde(default)]
    pub footers: Vec<HeaderFooterRef>,
    #[serde(default)]
    pub page_size: Option<PageSize>,
    #[serde(default)]
    pub margins: Option<PageMargins>,
    #[serde(default)]
    pub page_numbering: Option<PageNumbering>,
    /// Column spacing in twips (single-column layout)
    #[serde(default)]
    pub cols_space: Option<u32>,
    /// Section-type discriminator, e.g. "nextPage" or "continuous"
    #[serde(default)]
    pub section_type: Option<String>,
    /// First page of the section uses the "first" header/footer references
    #[serde(default)]
    pub title_page: bool,
    /// Document-grid line pitch in twips
    #[serde(default)]
    pub doc_grid_line_pitch: Option<u32>,
}

impl SectionConfig {
    /// Deserialize a configuration handed across a process boundary as JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Renders a configuration into a `<w:sectPr>` fragment.
///
/// Pure function: equal configurations yield byte-identical output. Child
/// order is fixed by the schema: header references, footer references,
/// pgSz, pgMar, pgNumType, cols, type, titlePg, docGrid.
pub fn build_section_properties(config: &SectionConfig) -> String {
    let mut xml = String::new();
    xml.push_str("<w:sectPr>");

    for header in &config.headers {
        xml.push_str(&format!(
            r#"<w:headerReference w:type="{}" r:id="{}"/>"#,
            header.ref_type.as_str(),
            escape_xml_attr(&header.rel_id)
        ));
    }

    for footer in &config.footers {
        xml.push_str(&format!(
            r#"<w:footerReference w:type="{}" r:id="{}"/>"#,
            footer.ref_type.as_str(),
            escape_xml_attr(&footer.rel_id)
        ));
    }

    if let Some(size) = &config.page_size {
        xml.push_str(&format!(r#"<w:pgSz w:w="{}" w:h="{}""#, size.width, size.height));
        if let Some(orient) = size.orientation {
            xml.push_str(&format!(r#" w:orient="{}""#, orient.as_str()));
        }
        xml.push_str("/>");
    }

    if let Some(margins) = &config.margins {
        xml.push_str("<w:pgMar");
        if let Some(top) = margins.top {
            xml.push_str(&format!(r#" w:top="{}""#, top));
        }
        if let Some(right) = margins.right {
            xml.push_str(&format!(r#" w:right="{}""#, right));
        }
        if let Some(bottom) = margins.bottom {
            xml.push_str(&format!(r#" w:bottom="{}""#, bottom));
        }
        if let Some(left) = margins.left {
            xml.push_str(&format!(r#" w:left="{}""#, left));
        }
        if let Some(header) = margins.header {
            xml.push_str(&format!(r#" w:header="{}""#, header));
        }
        if let Some(footer) = margins.footer {
            xml.push_str(&format!(r#" w:footer="{}""#, footer));
        }
        if let Some(gutter) = margins.gutter {
            xml.push_str(&format!(r#" w:gutter="{}""#, gutter));
        }
        xml.push_str("/>");
    }

    if let Some(numbering) = &config.page_numbering {
        xml.push_str(&format!(
            r#"<w:pgNumType w:fmt="{}""#,
            escape_xml_attr(&numbering.format)
        ));
        if let Some(start) = numbering.start {
            xml.push_str(&format!(r#" w:start="{}""#, start));
        }
        xml.push_str("/>");
    }

    if let Some(space) = config.cols_space {
        xml.push_str(&format!(r#"<w:cols w:space="{}"/>"#, space));
    }

    if let Some(section_type) = &config.section_type {
        xml.push_str(&format!(
            r#"<w:type w:val="{}"/>"#,
            escape_xml_attr(section_type)
        ));
    }

    if config.title_page {
        xml.push_str("<w:titlePg/>");
    }

    if let Some(pitch) = config.doc_grid_line_pitch {
        xml.push_str(&format!(r#"<w:docGrid w:linePitch="{}"/>"#, pitch));
    }

    xml.push_str("</w:sectPr>");
    xml
}

/// Escape special XML characters in text content
fn escape_xml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape special XML characters in attribute values
fn escape_xml_attr(attr: &str) -> String {
    escape_xml_text(attr)
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> SectionConfig {
        SectionConfig {
            headers: vec![
                HeaderFooterRef::new(HeaderFooterRefType::Default, "rId7"),
                HeaderFooterRef::new(HeaderFooterRefType::First, "rId9"),
            ],
            footers: vec![HeaderFooterRef::new(HeaderFooterRefType::Default, "rId8")],
            page_size: Some(PageSize {
                width: 16838,
                height: 11906,
                orientation: Some(Orientation::Landscape),
            }),
            margins: Some(PageMargins {
                top: Some(1440),
                right: Some(1440),
                bottom: Some(1440),
                left: Some(1440),
                header: Some(709),
                footer: Some(709),
                gutter: Some(0),
            }),
            page_numbering: Some(PageNumbering {
                format: "decimal".to_string(),
                start: Some(1),
            }),
            cols_space: Some(708),
            section_type: Some("nextPage".to_string()),
            title_page: true,
            doc_grid_line_pitch: Some(360),
        }
    }

    #[test]
    fn test_schema_child_order() {
        let xml = build_section_properties(&full_config());
        let order = [
            "<w:headerReference",
            "<w:footerReference",
            "<w:pgSz",
            "<w:pgMar",
            "<w:pgNumType",
            "<w:cols",
            "<w:type",
            "<w:titlePg",
            "<w:docGrid",
        ];
        let mut last = 0;
        for tag in order {
            let pos = xml[last..].find(tag).unwrap_or_else(|| panic!("missing {}", tag));
            last += pos;
        }
        assert!(xml.starts_with("<w:sectPr>"));
        assert!(xml.ends_with("</w:sectPr>"));
    }

    #[test]
    fn test_absent_fields_emit_nothing() {
        let xml = build_section_properties(&SectionConfig::default());
        assert_eq!(xml, "<w:sectPr></w:sectPr>");

        let only_size = SectionConfig {
            page_size: Some(PageSize {
                width: 11906,
                height: 16838,
                orientation: None,
            }),
            ..Default::default()
        };
        let xml = build_section_properties(&only_size);
        assert_eq!(xml, r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#);
        assert!(!xml.contains("w:orient"));
    }

    #[test]
    fn test_optional_attributes_follow_field_presence() {
        let config = SectionConfig {
            margins: Some(PageMargins {
                top: Some(1440),
                gutter: Some(0),
                ..Default::default()
            }),
            page_numbering: Some(PageNumbering {
                format: "lowerRoman".to_string(),
                start: None,
            }),
            ..Default::default()
        };
        let xml = build_section_properties(&config);
        assert!(xml.contains(r#"<w:pgMar w:top="1440" w:gutter="0"/>"#));
        assert!(xml.contains(r#"<w:pgNumType w:fmt="lowerRoman"/>"#));
        assert!(!xml.contains("w:start"));
    }

    #[test]
    fn test_deterministic_output() {
        let a = build_section_properties(&full_config());
        let b = build_section_properties(&full_config());
        assert_eq!(a, b);
    }

    #[test]
    fn test_order_invariant_under_field_assignment_order() {
        // Assigning fields in a different source order produces the same
        // value, hence the same bytes.
        let mut reordered = SectionConfig::default();
        reordered.doc_grid_line_pitch = Some(360);
        reordered.title_page = true;
        reordered.section_type = Some("nextPage".to_string());
        reordered.cols_space = Some(708);
        reordered.page_numbering = Some(PageNumbering {
            format: "decimal".to_string(),
            start: Some(1),
        });
        reordered.margins = full_config().margins;
        reordered.page_size = full_config().page_size;
        reordered.footers = full_config().footers;
        reordered.headers = full_config().headers;
        assert_eq!(
            build_section_properties(&reordered),
            build_section_properties(&full_config())
        );
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let config = SectionConfig {
            headers: vec![HeaderFooterRef::new(HeaderFooterRefType::Default, "r\"<&>")],
            ..Default::default()
        };
        let xml = build_section_properties(&config);
        assert!(xml.contains(r#"r:id="r&quot;&lt;&amp;&gt;""#));
    }

    #[test]
    fn test_json_round_trip() {
        let config = full_config();
        let json = config.to_json().unwrap();
        let parsed = SectionConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_with_defaults_omitted() {
        let config = SectionConfig::from_json(r#"{"page_size":{"width":11906,"height":16838}}"#)
            .unwrap();
        assert!(config.headers.is_empty());
        assert_eq!(config.page_size.unwrap().width, 11906);
        assert!(!config.title_page);
    }
}
