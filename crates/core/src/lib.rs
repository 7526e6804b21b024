//! Core domain types, outline normalization, and outline generation
//! for slidegen.

pub mod clean;
pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod normalize;
pub mod prompt;
pub mod provider;
pub mod types;

pub use clean::clean_text;
pub use config::{
    deck_filename, DeckOptions, GenerationRequest, GeneratorConfig, ModelVariant,
    PPTX_CONTENT_TYPE,
};
pub use error::{Error, Result};
pub use generator::OutlineGenerator;
pub use normalize::{normalize_outline, normalize_value};
pub use provider::{ImageSource, LanguageModel};
pub use types::{
    Generation, ImageFormat, Outline, OutlineSource, SlideImage, SlideRecord, SoftFailure,
};
