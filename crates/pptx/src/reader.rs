//! PPTX deck reader.
//!
//! Reads slide titles, bullets, and picture counts back out of a `.pptx`
//! package. The title is the text of the topmost shape; every paragraph of
//! the shapes below it is a bullet.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use slidegen_core::{Error, Result};
use std::io::{Read, Seek};
use zip::ZipArchive;

/// What one slide of a deck contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Text of the topmost text shape, if the slide has any text.
    pub title: Option<String>,

    /// Paragraphs of the remaining text shapes, in reading order.
    pub bullets: Vec<String>,

    /// Number of picture shapes.
    pub pictures: usize,
}

/// Reader for PPTX (Office Open XML) decks.
pub struct DeckReader;

impl DeckReader {
    /// Create a new deck reader.
    pub fn new() -> Self {
        Self
    }

    /// Read every slide of a deck, in presentation order.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<InspectedSlide>> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;

        slide_order
            .iter()
            .enumerate()
            .map(|(idx, path)| self.read_slide(&mut archive, path, idx + 1))
            .collect()
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut id = String::new();

                    for attr in e.attributes().flatten() {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"Type" => rel_type = value,
                            b"Target" => target = value,
                            b"Id" => id = value,
                            _ => {}
                        }
                    }

                    if rel_type.ends_with("/slide") {
                        let order = extract_number(&id).or_else(|| extract_number(&target));
                        let full_path = match target.strip_prefix('/') {
                            Some(absolute) => absolute.to_string(),
                            None => format!("ppt/{}", target),
                        };
                        slides.push((full_path, order));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
                }
                _ => {}
            }
        }

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Read a single slide from the archive.
    fn read_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        number: usize,
    ) -> Result<InspectedSlide> {
        let content = read_file_from_archive(archive, slide_path)?;
        let mut shapes = extract_shapes(&content);

        let pictures = shapes.iter().filter(|s| s.is_picture).count();
        shapes.retain(|s| !s.paragraphs.is_empty());

        // Top-to-bottom, then left-to-right
        shapes.sort_by(|a, b| (a.y, a.x).cmp(&(b.y, b.x)));

        let mut shapes = shapes.into_iter();
        let title = shapes.next().map(|s| s.paragraphs.join(" "));
        let bullets = shapes.flat_map(|s| s.paragraphs).collect();

        Ok(InspectedSlide {
            number,
            title,
            bullets,
            pictures,
        })
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A shape with its paragraphs and position.
#[derive(Debug, Default)]
struct ShapeInfo {
    paragraphs: Vec<String>,
    is_picture: bool,
    x: i64,
    y: i64,
}

/// Extract shapes with text and position from slide XML.
fn extract_shapes(xml_content: &str) -> Vec<ShapeInfo> {
    let mut shapes = Vec::new();
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut current_shape: Option<ShapeInfo> = None;
    let mut current_paragraph: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current_shape = Some(ShapeInfo::default()),
                b"pic" => {
                    current_shape = Some(ShapeInfo {
                        is_picture: true,
                        ..ShapeInfo::default()
                    })
                }
                b"off" => read_offset(e, current_shape.as_mut()),
                b"p" if current_shape.is_some() => current_paragraph = Some(String::new()),
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if local_name(e.name().as_ref()) == b"off" {
                    read_offset(e, current_shape.as_mut());
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(paragraph) = current_paragraph.as_mut() {
                    paragraph.push_str(&e.unescape().unwrap_or_default());
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    if let Some(shape) = current_shape.take() {
                        shapes.push(shape);
                    }
                    current_paragraph = None;
                }
                b"p" => {
                    if let (Some(paragraph), Some(shape)) =
                        (current_paragraph.take(), current_shape.as_mut())
                    {
                        let paragraph = paragraph.trim();
                        if !paragraph.is_empty() {
                            shape.paragraphs.push(paragraph.to_string());
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML parsing error (continuing): {}", e);
            }
            _ => {}
        }
    }

    shapes
}

/// Record an `<a:off x=".." y=".."/>` position on the current shape.
fn read_offset(element: &BytesStart<'_>, shape: Option<&mut ShapeInfo>) {
    let Some(shape) = shape else {
        return;
    };

    for attr in element.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).parse::<i64>();
        match (attr.key.as_ref(), value) {
            (b"x", Ok(x)) => shape.x = x,
            (b"y", Ok(y)) => shape.y = y,
            _ => {}
        }
    }
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::Zip(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Extract a trailing number from a string like "rId2" or "slide3.xml".
fn extract_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
