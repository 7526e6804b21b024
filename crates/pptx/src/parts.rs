//! Package parts shared by every generated deck.
//!
//! The master, layout, theme, and presentation properties are fixed
//! documents; the content types, relationships, and presentation part depend
//! on how many slides and pictures the deck holds.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use slidegen_core::{Error, ImageFormat, Result};

pub(crate) const SLIDE_MASTER_XML: &str = include_str!("../resources/slideMaster1.xml");
pub(crate) const SLIDE_LAYOUT_XML: &str = include_str!("../resources/slideLayout1.xml");
pub(crate) const THEME_XML: &str = include_str!("../resources/theme1.xml");
pub(crate) const PRES_PROPS_XML: &str = include_str!("../resources/presProps.xml");

pub(crate) const NS_MAIN: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_PML: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_PACKAGE_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Relationship types used by the package.
pub(crate) mod rel_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// Content types registered for package parts.
mod content_type {
    pub const RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
}

/// Slide size: 10in x 7.5in.
pub(crate) const SLIDE_WIDTH_EMU: i64 = 9_144_000;
pub(crate) const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

/// First relationship id used for slides in `presentation.xml.rels`.
const FIRST_SLIDE_REL: usize = 4;

/// Small wrapper over a quick-xml writer for building one part.
pub(crate) struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    /// Start a part with the standard XML declaration.
    pub(crate) fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { writer })
    }

    pub(crate) fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        self.writer
            .write_event(Event::Start(element(name, attrs)))
            .map_err(xml_error)?;
        Ok(self)
    }

    pub(crate) fn close(&mut self, name: &str) -> Result<&mut Self> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)?;
        Ok(self)
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        self.writer
            .write_event(Event::Empty(element(name, attrs)))
            .map_err(xml_error)?;
        Ok(self)
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<&mut Self> {
        let safe = xml_safe(text);
        self.writer
            .write_event(Event::Text(BytesText::new(&safe)))
            .map_err(xml_error)?;
        Ok(self)
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &(key, value) in attrs {
        start.push_attribute((key, value));
    }
    start
}

fn xml_error(e: quick_xml::Error) -> Error {
    Error::Xml(e.to_string())
}

/// Drop characters that XML 1.0 cannot represent.
fn xml_safe(text: &str) -> String {
    text.chars()
        .filter(|&c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Relationship id of the n-th slide (0-based) in `presentation.xml.rels`.
pub(crate) fn slide_rel_id(index: usize) -> String {
    format!("rId{}", index + FIRST_SLIDE_REL)
}

/// `[Content_Types].xml` for a deck.
pub(crate) fn content_types_xml(slide_count: usize, image_formats: &[ImageFormat]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open("Types", &[("xmlns", NS_CONTENT_TYPES)])?
        .empty(
            "Default",
            &[("Extension", "rels"), ("ContentType", content_type::RELS)],
        )?
        .empty(
            "Default",
            &[("Extension", "xml"), ("ContentType", content_type::XML)],
        )?;

    let mut seen: Vec<ImageFormat> = Vec::new();
    for &format in image_formats {
        if seen.contains(&format) {
            continue;
        }
        seen.push(format);
        part.empty(
            "Default",
            &[
                ("Extension", format.extension()),
                ("ContentType", format.content_type()),
            ],
        )?;
    }

    let overrides = [
        ("/ppt/presentation.xml", content_type::PRESENTATION),
        ("/ppt/slideMasters/slideMaster1.xml", content_type::SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", content_type::SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", content_type::THEME),
        ("/ppt/presProps.xml", content_type::PRES_PROPS),
    ];
    for (name, kind) in overrides {
        part.empty("Override", &[("PartName", name), ("ContentType", kind)])?;
    }

    for number in 1..=slide_count {
        let name = format!("/ppt/slides/slide{number}.xml");
        part.empty(
            "Override",
            &[("PartName", name.as_str()), ("ContentType", content_type::SLIDE)],
        )?;
    }

    part.close("Types")?;
    Ok(part.finish())
}

/// A relationships part from `(id, type, target)` triples.
pub(crate) fn relationships_xml(rels: &[(String, &str, String)]) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open("Relationships", &[("xmlns", NS_PACKAGE_RELS)])?;
    for (id, kind, target) in rels {
        part.empty(
            "Relationship",
            &[("Id", id.as_str()), ("Type", *kind), ("Target", target.as_str())],
        )?;
    }
    part.close("Relationships")?;
    Ok(part.finish())
}

/// `_rels/.rels`: the package points at the presentation part.
pub(crate) fn root_rels_xml() -> Result<Vec<u8>> {
    relationships_xml(&[(
        "rId1".to_string(),
        rel_type::OFFICE_DOCUMENT,
        "ppt/presentation.xml".to_string(),
    )])
}

/// `ppt/_rels/presentation.xml.rels`.
pub(crate) fn presentation_rels_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut rels = vec![
        (
            "rId1".to_string(),
            rel_type::SLIDE_MASTER,
            "slideMasters/slideMaster1.xml".to_string(),
        ),
        ("rId2".to_string(), rel_type::THEME, "theme/theme1.xml".to_string()),
        ("rId3".to_string(), rel_type::PRES_PROPS, "presProps.xml".to_string()),
    ];
    for index in 0..slide_count {
        rels.push((
            slide_rel_id(index),
            rel_type::SLIDE,
            format!("slides/slide{}.xml", index + 1),
        ));
    }
    relationships_xml(&rels)
}

/// `ppt/presentation.xml`.
pub(crate) fn presentation_xml(slide_count: usize) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open(
        "p:presentation",
        &[
            ("xmlns:a", NS_MAIN),
            ("xmlns:r", NS_REL),
            ("xmlns:p", NS_PML),
            ("saveSubsetFonts", "1"),
        ],
    )?
    .open("p:sldMasterIdLst", &[])?
    .empty("p:sldMasterId", &[("id", "2147483648"), ("r:id", "rId1")])?
    .close("p:sldMasterIdLst")?;

    if slide_count > 0 {
        part.open("p:sldIdLst", &[])?;
        for index in 0..slide_count {
            let id = (256 + index).to_string();
            part.empty("p:sldId", &[("id", id.as_str()), ("r:id", slide_rel_id(index).as_str())])?;
        }
        part.close("p:sldIdLst")?;
    }

    part.empty(
        "p:sldSz",
        &[
            ("cx", SLIDE_WIDTH_EMU.to_string().as_str()),
            ("cy", SLIDE_HEIGHT_EMU.to_string().as_str()),
            ("type", "screen4x3"),
        ],
    )?
    .empty(
        "p:notesSz",
        &[
            ("cx", SLIDE_HEIGHT_EMU.to_string().as_str()),
            ("cy", SLIDE_WIDTH_EMU.to_string().as_str()),
        ],
    )?
    .close("p:presentation")?;

    Ok(part.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_text_is_escaped() {
        let mut part = XmlPart::new().unwrap();
        part.open("a:t", &[]).unwrap().text("R&D <2025>").unwrap().close("a:t").unwrap();
        let xml = as_text(part.finish());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(xml.ends_with("<a:t>R&amp;D &lt;2025&gt;</a:t>"));
    }

    #[test]
    fn test_main_part_type_matches_package_type() {
        assert_eq!(
            content_type::PRESENTATION,
            format!("{}.main+xml", slidegen_core::PPTX_CONTENT_TYPE)
        );

        let xml = as_text(content_types_xml(1, &[]).unwrap());
        assert!(xml.contains(&format!(
            r#"PartName="/ppt/presentation.xml" ContentType="{}.main+xml""#,
            slidegen_core::PPTX_CONTENT_TYPE
        )));
    }

    #[test]
    fn test_control_characters_dropped() {
        assert_eq!(xml_safe("a\u{0}b\u{7}c\td\ne"), "abc\td\ne");
    }

    #[test]
    fn test_content_types_lists_slides_and_image_formats_once() {
        let xml = as_text(
            content_types_xml(2, &[ImageFormat::Jpeg, ImageFormat::Jpeg, ImageFormat::Png]).unwrap(),
        );

        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(!xml.contains("slide3.xml"));
        assert_eq!(xml.matches(r#"Extension="jpeg""#).count(), 1);
        assert_eq!(xml.matches(r#"Extension="png""#).count(), 1);
    }

    #[test]
    fn test_presentation_rels_order_slides_after_fixed_parts() {
        let xml = as_text(presentation_rels_xml(2).unwrap());

        assert!(xml.contains(r#"Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml""#));
        assert!(xml.contains(r#"Id="rId5""#));
        assert!(xml.contains(r#"Target="presProps.xml""#));
    }

    #[test]
    fn test_presentation_without_slides_omits_slide_list() {
        let xml = as_text(presentation_xml(0).unwrap());
        assert!(!xml.contains("sldIdLst"));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/>"#));

        let xml = as_text(presentation_xml(3).unwrap());
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId6"/>"#));
    }
}
