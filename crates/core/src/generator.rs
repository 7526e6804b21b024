//! Outline generation with template fallback.
//!
//! The generator asks a [`LanguageModel`] for a JSON outline, pulls the first
//! bracketed region out of the free-form answer, and normalizes it. Anything
//! that goes wrong along the way is a [`SoftFailure`]: the request still
//! succeeds, with the fixed template outline instead of model content.

use crate::fallback::fallback_outline;
use crate::normalize::normalize_value;
use crate::prompt::outline_prompt;
use crate::provider::LanguageModel;
use crate::types::{Generation, Outline, OutlineSource, SlideRecord, SoftFailure};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Greedy match from the first `[` to the last `]`, across lines.
static JSON_ARRAY_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Find the JSON array region in a model response.
///
/// A response with several bracketed regions yields the whole span from the
/// first `[` to the last `]`.
pub fn extract_json_array(text: &str) -> Option<&str> {
    JSON_ARRAY_REGEX.find(text).map(|m| m.as_str())
}

/// Parse a model response into slide records.
pub fn parse_outline(text: &str) -> Result<Vec<SlideRecord>, SoftFailure> {
    let json = extract_json_array(text).ok_or(SoftFailure::NoJsonArray)?;

    let value: Value =
        serde_json::from_str(json).map_err(|e| SoftFailure::InvalidJson(e.to_string()))?;

    let slides = normalize_value(&value);
    if slides.is_empty() {
        return Err(SoftFailure::EmptyOutline);
    }

    Ok(slides)
}

/// Produces outlines for topics using a language model.
#[derive(Debug, Clone)]
pub struct OutlineGenerator<M> {
    model: M,
    debug: bool,
}

impl<M: LanguageModel> OutlineGenerator<M> {
    /// Create a generator backed by the given model.
    pub fn new(model: M) -> Self {
        Self {
            model,
            debug: false,
        }
    }

    /// Keep the raw model response in the returned [`Generation`].
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Generate an outline, falling back to templates on any soft failure.
    pub fn generate(&self, topic: &str, num_slides: usize) -> Generation {
        let prompt = outline_prompt(topic, num_slides);

        let (result, raw_response) = match self.model.generate_text(&prompt) {
            Ok(Some(text)) if !text.is_empty() => {
                if self.debug {
                    log::debug!("Raw model output:\n{}", text);
                }
                (parse_outline(&text), Some(text))
            }
            Ok(_) => (Err(SoftFailure::NoResponse), None),
            Err(e) => (Err(SoftFailure::ModelError(e.to_string())), None),
        };

        let outline = match result {
            Ok(slides) => {
                log::info!("Generated {} slides from the model", slides.len());
                Outline {
                    slides,
                    source: OutlineSource::Generated,
                }
            }
            Err(failure) => {
                log::warn!("Using fallback outline template: {}", failure);
                Outline {
                    slides: fallback_outline(topic, num_slides),
                    source: OutlineSource::Fallback(failure),
                }
            }
        };

        Generation {
            outline,
            raw_response: raw_response.filter(|_| self.debug),
        }
    }
}
