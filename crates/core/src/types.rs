//! Domain types for generated presentation content.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of bullets kept on a single slide.
pub const MAX_BULLETS: usize = 6;

/// Title used when the model omits one.
pub const UNTITLED: &str = "Untitled";

/// One normalized slide: a title and a bounded list of bullets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Slide title, never empty.
    pub title: String,

    /// Bullet points in display order.
    pub bullets: Vec<String>,
}

impl SlideRecord {
    /// Create a new slide record.
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            title: title.into(),
            bullets,
        }
    }
}

/// Why a model response could not be turned into an outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftFailure {
    /// The model returned no text at all.
    NoResponse,
    /// The response text contained no `[...]` region.
    NoJsonArray,
    /// The bracketed region was not valid JSON.
    InvalidJson(String),
    /// The response parsed, but produced no slides.
    EmptyOutline,
    /// The model call itself failed.
    ModelError(String),
}

impl fmt::Display for SoftFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoResponse => write!(f, "model returned no text"),
            Self::NoJsonArray => write!(f, "JSON format not found in model output"),
            Self::InvalidJson(e) => write!(f, "failed to parse JSON response: {e}"),
            Self::EmptyOutline => write!(f, "model output contained no slides"),
            Self::ModelError(e) => write!(f, "error generating content: {e}"),
        }
    }
}

/// Where an outline came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineSource {
    /// Parsed from the language model's response.
    Generated,
    /// Built from the fixed template catalog after a soft failure.
    Fallback(SoftFailure),
}

/// The slides for one request, tagged with their origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    /// Slides in presentation order.
    pub slides: Vec<SlideRecord>,

    /// Whether these slides are real model content or filler.
    pub source: OutlineSource,
}

impl Outline {
    /// Whether the slides came from the model.
    pub fn is_generated(&self) -> bool {
        self.source == OutlineSource::Generated
    }

    /// The soft failure that caused a fallback, if any.
    pub fn failure(&self) -> Option<&SoftFailure> {
        match &self.source {
            OutlineSource::Generated => None,
            OutlineSource::Fallback(failure) => Some(failure),
        }
    }
}

/// Result of one outline generation request.
#[derive(Debug, Clone)]
pub struct Generation {
    /// The outline to assemble.
    pub outline: Outline,

    /// Raw model text, kept for debug display.
    pub raw_response: Option<String>,
}

/// Supported picture formats for slide images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }

        None
    }

    /// File extension used inside the package.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }

    /// MIME type registered in `[Content_Types].xml`.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }
}

/// Picture bytes for a slide, with their detected format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl SlideImage {
    /// Wrap raw bytes, returning `None` when the format is not recognised.
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        let format = ImageFormat::from_magic(&bytes)?;
        Some(Self { bytes, format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_format_from_magic() {
        assert_eq!(
            ImageFormat::from_magic(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic(b"\x89PNG\r\n\x1a\nrest"),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::from_magic(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_magic(b"<html>"), None);
        assert_eq!(ImageFormat::from_magic(&[]), None);
    }

    #[test]
    fn test_slide_image_rejects_unknown_bytes() {
        assert!(SlideImage::from_bytes(b"not an image".to_vec()).is_none());

        let image = SlideImage::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xDB]).unwrap();
        assert_eq!(image.format, ImageFormat::Jpeg);
        assert_eq!(image.format.extension(), "jpeg");
    }

    #[test]
    fn test_outline_failure_accessor() {
        let generated = Outline {
            slides: vec![SlideRecord::new("A", vec![])],
            source: OutlineSource::Generated,
        };
        assert!(generated.is_generated());
        assert_eq!(generated.failure(), None);

        let fallback = Outline {
            slides: vec![],
            source: OutlineSource::Fallback(SoftFailure::NoJsonArray),
        };
        assert!(!fallback.is_generated());
        assert_eq!(fallback.failure(), Some(&SoftFailure::NoJsonArray));
    }
}
