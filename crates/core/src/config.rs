//! Request-scoped configuration values and input validation.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Fewest slides a request may ask for.
pub const MIN_SLIDES: usize = 3;

/// Most slides a request may ask for.
pub const MAX_SLIDES: usize = 15;

/// Slide count used when none is given.
pub const DEFAULT_SLIDES: usize = 5;

/// Content type of the generated deck.
pub const PPTX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Language model variants a request may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelVariant {
    /// Best quality.
    #[default]
    Gemini25Pro,
    /// Faster responses.
    Gemini25Flash,
    Gemini15Pro,
}

impl ModelVariant {
    /// All selectable variants, default first.
    pub const ALL: [ModelVariant; 3] = [
        ModelVariant::Gemini25Pro,
        ModelVariant::Gemini25Flash,
        ModelVariant::Gemini15Pro,
    ];

    /// Model identifier sent to the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gemini25Pro => "gemini-2.5-pro",
            Self::Gemini25Flash => "gemini-2.5-flash",
            Self::Gemini15Pro => "gemini-1.5-pro",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|variant| variant.as_str() == wanted)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                format!("unknown model '{s}' (expected one of: {})", allowed.join(", "))
            })
    }
}

/// Credentials and model selection for the outline generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Language model API key.
    pub api_key: String,

    /// Selected model variant.
    pub model: ModelVariant,

    /// Keep and report the raw model response.
    pub debug: bool,
}

impl GeneratorConfig {
    /// Create a config for the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: ModelVariant::default(),
            debug: false,
        }
    }

    /// Select a model variant.
    pub fn with_model(mut self, model: ModelVariant) -> Self {
        self.model = model;
        self
    }

    /// Enable or disable debug output.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Reject a config without a usable API key.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::InvalidInput(
                "a language model API key is required to generate presentations".to_string(),
            ));
        }
        Ok(())
    }
}

/// Options for deck assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeckOptions {
    /// Try to add one stock picture per slide.
    pub include_images: bool,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Presentation topic, trimmed.
    pub topic: String,

    /// Requested number of slides.
    pub num_slides: usize,
}

impl GenerationRequest {
    /// Build and validate a request.
    pub fn new(topic: &str, num_slides: usize) -> Result<Self> {
        let request = Self {
            topic: topic.trim().to_string(),
            num_slides,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check the topic and slide count.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(Error::InvalidInput(
                "please enter a valid presentation topic".to_string(),
            ));
        }

        if !(MIN_SLIDES..=MAX_SLIDES).contains(&self.num_slides) {
            return Err(Error::InvalidInput(format!(
                "number of slides must be between {MIN_SLIDES} and {MAX_SLIDES}, got {}",
                self.num_slides
            )));
        }

        Ok(())
    }

    /// Download filename for the generated deck.
    pub fn deck_filename(&self) -> String {
        deck_filename(&self.topic)
    }
}

/// Characters that cannot appear in a file name on common platforms.
const RESERVED_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Stem used when nothing usable is left of the topic.
const DEFAULT_DECK_STEM: &str = "presentation";

/// Derive the deck filename from a topic.
///
/// Spaces, path separators, reserved characters, and control characters
/// become underscores. Leading dots are dropped, so the name is always a
/// single plain path component.
pub fn deck_filename(topic: &str) -> String {
    let stem: String = topic
        .trim()
        .chars()
        .map(|c| {
            if c == ' ' || c.is_control() || RESERVED_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let stem = stem.trim_start_matches('.');
    let stem = if stem.is_empty() { DEFAULT_DECK_STEM } else { stem };

    format!("{stem}.pptx")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_variant_round_trips_names() {
        for variant in ModelVariant::ALL {
            assert_eq!(variant.as_str().parse::<ModelVariant>(), Ok(variant));
        }
        assert_eq!(ModelVariant::default(), ModelVariant::Gemini25Pro);
    }

    #[test]
    fn test_model_variant_rejects_unknown() {
        let err = "gpt-4".parse::<ModelVariant>().unwrap_err();
        assert!(err.contains("gemini-2.5-pro"));
    }

    #[test]
    fn test_config_requires_api_key() {
        assert!(matches!(
            GeneratorConfig::new("  ").validate(),
            Err(Error::InvalidInput(_))
        ));
        assert!(GeneratorConfig::new("key").validate().is_ok());
    }

    #[test]
    fn test_request_trims_topic() {
        let request = GenerationRequest::new("  Future of Energy ", 5).unwrap();
        assert_eq!(request.topic, "Future of Energy");
    }

    #[test]
    fn test_request_rejects_blank_topic() {
        assert!(matches!(
            GenerationRequest::new("   ", 5),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_request_slide_bounds() {
        assert!(GenerationRequest::new("T", 2).is_err());
        assert!(GenerationRequest::new("T", 3).is_ok());
        assert!(GenerationRequest::new("T", 15).is_ok());
        assert!(GenerationRequest::new("T", 16).is_err());
    }

    #[test]
    fn test_deck_filename() {
        assert_eq!(
            deck_filename(" The Future of Renewable Energy "),
            "The_Future_of_Renewable_Energy.pptx"
        );
        assert_eq!(deck_filename("AI"), "AI.pptx");
    }

    #[test]
    fn test_deck_filename_is_a_single_path_component() {
        use std::path::{Component, Path};

        assert_eq!(deck_filename("AI/ML"), "AI_ML.pptx");
        assert_eq!(deck_filename(r"C:\temp\deck"), "C__temp_deck.pptx");
        assert_eq!(deck_filename("What? <Now> | \"Why\"*"), "What___Now_____Why__.pptx");
        assert_eq!(deck_filename("tab\there"), "tab_there.pptx");
        assert_eq!(deck_filename("../../escape here"), "_.._escape_here.pptx");
        assert_eq!(deck_filename(".hidden"), "hidden.pptx");
        assert_eq!(deck_filename(".."), "presentation.pptx");
        assert_eq!(deck_filename("   "), "presentation.pptx");

        for topic in ["../../escape here", "..", "/etc/passwd", r"..\..\x", "a/../b"] {
            let name = deck_filename(topic);
            let components: Vec<Component> = Path::new(&name).components().collect();
            assert_eq!(components.len(), 1, "{name}");
            assert!(matches!(components[0], Component::Normal(_)), "{name}");
        }
    }
}
