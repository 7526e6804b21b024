//! Deck assembly: slide records in, `.pptx` bytes out.

use crate::parts::{
    self, rel_type, XmlPart, NS_MAIN, NS_PML, NS_REL, PRES_PROPS_XML, SLIDE_LAYOUT_XML,
    SLIDE_MASTER_XML, THEME_XML,
};
use slidegen_core::{DeckOptions, Error, ImageSource, Result, SlideImage, SlideRecord};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const EMU_PER_INCH: f64 = 914_400.0;

/// Title colour (dark blue).
const TITLE_COLOR: &str = "003366";
const TITLE_SIZE: &str = "3200";
const BULLET_SIZE: &str = "2000";

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
}

impl Frame {
    fn inches(x: f64, y: f64, cx: f64, cy: f64) -> Self {
        Self {
            x: emu(x),
            y: emu(y),
            cx: emu(cx),
            cy: emu(cy),
        }
    }
}

fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Builds slide decks from normalized slide records.
pub struct DeckAssembler<'a> {
    options: DeckOptions,
    images: Option<&'a dyn ImageSource>,
}

impl<'a> DeckAssembler<'a> {
    /// Create an assembler with the given options and no image source.
    pub fn new(options: DeckOptions) -> Self {
        Self {
            options,
            images: None,
        }
    }

    /// Use an image source for slide pictures.
    pub fn with_image_source(mut self, source: &'a dyn ImageSource) -> Self {
        self.images = Some(source);
        self
    }

    /// Assemble a deck, one slide per record, in order.
    ///
    /// Picture lookups never fail the deck; a slide whose lookup fails is
    /// written without a picture. Errors writing the package propagate.
    pub fn assemble(&self, slides: &[SlideRecord]) -> Result<Cursor<Vec<u8>>> {
        let pictures: Vec<Option<SlideImage>> = slides
            .iter()
            .map(|slide| self.lookup_image(&slide.title))
            .collect();

        let mut cursor = write_package(slides, &pictures)?;
        cursor.set_position(0);
        Ok(cursor)
    }

    fn lookup_image(&self, title: &str) -> Option<SlideImage> {
        if !self.options.include_images {
            return None;
        }

        let Some(source) = self.images else {
            log::debug!("Images requested but no image source configured");
            return None;
        };

        let image = source.find_image(title);
        if image.is_none() {
            log::warn!("No image found for slide '{}'", title);
        }
        image
    }
}

/// Write every package part into an in-memory ZIP archive.
fn write_package(slides: &[SlideRecord], pictures: &[Option<SlideImage>]) -> Result<Cursor<Vec<u8>>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let formats: Vec<_> = pictures.iter().flatten().map(|p| p.format).collect();

    let mut put = |path: &str, bytes: &[u8]| -> Result<()> {
        zip.start_file(path, options).map_err(zip_error)?;
        zip.write_all(bytes)?;
        Ok(())
    };

    put("[Content_Types].xml", &parts::content_types_xml(slides.len(), &formats)?)?;
    put("_rels/.rels", &parts::root_rels_xml()?)?;
    put("ppt/presentation.xml", &parts::presentation_xml(slides.len())?)?;
    put(
        "ppt/_rels/presentation.xml.rels",
        &parts::presentation_rels_xml(slides.len())?,
    )?;
    put("ppt/presProps.xml", PRES_PROPS_XML.as_bytes())?;
    put("ppt/theme/theme1.xml", THEME_XML.as_bytes())?;
    put("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER_XML.as_bytes())?;
    put(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &parts::relationships_xml(&[
            (
                "rId1".to_string(),
                rel_type::SLIDE_LAYOUT,
                "../slideLayouts/slideLayout1.xml".to_string(),
            ),
            (
                "rId2".to_string(),
                rel_type::THEME,
                "../theme/theme1.xml".to_string(),
            ),
        ])?,
    )?;
    put("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT_XML.as_bytes())?;
    put(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &parts::relationships_xml(&[(
            "rId1".to_string(),
            rel_type::SLIDE_MASTER,
            "../slideMasters/slideMaster1.xml".to_string(),
        )])?,
    )?;

    let mut media_count = 0;
    for (index, (slide, picture)) in slides.iter().zip(pictures).enumerate() {
        let number = index + 1;
        let mut rels = vec![(
            "rId1".to_string(),
            rel_type::SLIDE_LAYOUT,
            "../slideLayouts/slideLayout1.xml".to_string(),
        )];

        let picture_rel = match picture {
            Some(image) => {
                media_count += 1;
                let media_name = format!("image{}.{}", media_count, image.format.extension());
                put(&format!("ppt/media/{media_name}"), &image.bytes)?;
                rels.push((
                    "rId2".to_string(),
                    rel_type::IMAGE,
                    format!("../media/{media_name}"),
                ));
                Some("rId2")
            }
            None => None,
        };

        put(
            &format!("ppt/slides/slide{number}.xml"),
            &slide_xml(slide, picture_rel)?,
        )?;
        put(
            &format!("ppt/slides/_rels/slide{number}.xml.rels"),
            &parts::relationships_xml(&rels)?,
        )?;
    }

    log::debug!(
        "Wrote {} slides with {} pictures",
        slides.len(),
        media_count
    );

    zip.finish().map_err(zip_error)
}

fn zip_error(e: zip::result::ZipError) -> Error {
    Error::Zip(e.to_string())
}

/// Build the XML for one slide.
fn slide_xml(slide: &SlideRecord, picture_rel: Option<&str>) -> Result<Vec<u8>> {
    let mut part = XmlPart::new()?;
    part.open(
        "p:sld",
        &[("xmlns:a", NS_MAIN), ("xmlns:r", NS_REL), ("xmlns:p", NS_PML)],
    )?
    .open("p:cSld", &[])?
    .open("p:spTree", &[])?
    .open("p:nvGrpSpPr", &[])?
    .empty("p:cNvPr", &[("id", "1"), ("name", "")])?
    .empty("p:cNvGrpSpPr", &[])?
    .empty("p:nvPr", &[])?
    .close("p:nvGrpSpPr")?
    .open("p:grpSpPr", &[])?
    .open("a:xfrm", &[])?
    .empty("a:off", &[("x", "0"), ("y", "0")])?
    .empty("a:ext", &[("cx", "0"), ("cy", "0")])?
    .empty("a:chOff", &[("x", "0"), ("y", "0")])?
    .empty("a:chExt", &[("cx", "0"), ("cy", "0")])?
    .close("a:xfrm")?
    .close("p:grpSpPr")?;

    // Title
    text_box_start(&mut part, 2, "Title", Frame::inches(0.5, 0.5, 9.0, 1.5), "none")?;
    part.open("a:p", &[])?
        .open("a:r", &[])?
        .open(
            "a:rPr",
            &[("lang", "en-US"), ("sz", TITLE_SIZE), ("b", "1"), ("dirty", "0")],
        )?
        .open("a:solidFill", &[])?
        .empty("a:srgbClr", &[("val", TITLE_COLOR)])?
        .close("a:solidFill")?
        .close("a:rPr")?
        .open("a:t", &[])?
        .text(&slide.title)?
        .close("a:t")?
        .close("a:r")?
        .close("a:p")?;
    text_box_end(&mut part)?;

    // Content, narrower than the slide to leave room for a picture
    text_box_start(&mut part, 3, "Content", Frame::inches(0.5, 2.0, 5.5, 4.0), "square")?;
    if slide.bullets.is_empty() {
        part.empty("a:p", &[])?;
    }
    for bullet in &slide.bullets {
        part.open("a:p", &[])?
            .open("a:r", &[])?
            .empty("a:rPr", &[("lang", "en-US"), ("sz", BULLET_SIZE), ("dirty", "0")])?
            .open("a:t", &[])?
            .text(bullet)?
            .close("a:t")?
            .close("a:r")?
            .close("a:p")?;
    }
    text_box_end(&mut part)?;

    if let Some(rel_id) = picture_rel {
        picture(&mut part, 4, &slide.title, rel_id, Frame::inches(6.2, 2.5, 3.0, 2.0))?;
    }

    part.close("p:spTree")?
        .close("p:cSld")?
        .open("p:clrMapOvr", &[])?
        .empty("a:masterClrMapping", &[])?
        .close("p:clrMapOvr")?
        .close("p:sld")?;

    Ok(part.finish())
}

/// Open a text box shape up to the start of its paragraphs.
fn text_box_start(part: &mut XmlPart, id: u32, name: &str, frame: Frame, wrap: &str) -> Result<()> {
    let id = id.to_string();
    part.open("p:sp", &[])?
        .open("p:nvSpPr", &[])?
        .empty("p:cNvPr", &[("id", id.as_str()), ("name", name)])?
        .empty("p:cNvSpPr", &[("txBox", "1")])?
        .empty("p:nvPr", &[])?
        .close("p:nvSpPr")?
        .open("p:spPr", &[])?;
    transform(part, frame)?;
    part.open("a:prstGeom", &[("prst", "rect")])?
        .empty("a:avLst", &[])?
        .close("a:prstGeom")?
        .close("p:spPr")?
        .open("p:txBody", &[])?
        .open("a:bodyPr", &[("wrap", wrap), ("rtlCol", "0")])?
        .empty("a:spAutoFit", &[])?
        .close("a:bodyPr")?
        .empty("a:lstStyle", &[])?;
    Ok(())
}

fn text_box_end(part: &mut XmlPart) -> Result<()> {
    part.close("p:txBody")?.close("p:sp")?;
    Ok(())
}

fn transform(part: &mut XmlPart, frame: Frame) -> Result<()> {
    part.open("a:xfrm", &[])?
        .empty(
            "a:off",
            &[
                ("x", frame.x.to_string().as_str()),
                ("y", frame.y.to_string().as_str()),
            ],
        )?
        .empty(
            "a:ext",
            &[
                ("cx", frame.cx.to_string().as_str()),
                ("cy", frame.cy.to_string().as_str()),
            ],
        )?
        .close("a:xfrm")?;
    Ok(())
}

/// A picture shape stretched over `frame`.
fn picture(part: &mut XmlPart, id: u32, description: &str, rel_id: &str, frame: Frame) -> Result<()> {
    let id = id.to_string();
    let name = format!("Picture {id}");
    part.open("p:pic", &[])?
        .open("p:nvPicPr", &[])?
        .empty(
            "p:cNvPr",
            &[("id", id.as_str()), ("name", name.as_str()), ("descr", description)],
        )?
        .open("p:cNvPicPr", &[])?
        .empty("a:picLocks", &[("noChangeAspect", "1")])?
        .close("p:cNvPicPr")?
        .empty("p:nvPr", &[])?
        .close("p:nvPicPr")?
        .open("p:blipFill", &[])?
        .empty("a:blip", &[("r:embed", rel_id)])?
        .open("a:stretch", &[])?
        .empty("a:fillRect", &[])?
        .close("a:stretch")?
        .close("p:blipFill")?
        .open("p:spPr", &[])?;
    transform(part, frame)?;
    part.open("a:prstGeom", &[("prst", "rect")])?
        .empty("a:avLst", &[])?
        .close("a:prstGeom")?
        .close("p:spPr")?
        .close("p:pic")?;
    Ok(())
}
