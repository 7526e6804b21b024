//! PPTX (Office Open XML) backend for slidegen.
//!
//! Writes decks as ZIP archives of XML parts, and reads them back for
//! inspection.

mod parts;
pub mod reader;
pub mod writer;

pub use reader::{DeckReader, InspectedSlide};
pub use writer::DeckAssembler;
