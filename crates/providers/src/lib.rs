//! Remote collaborators for slidegen: the Gemini language model and the
//! Pexels stock-photo search.

pub mod gemini;
pub mod pexels;

#[cfg(test)]
mod test_server;

pub use gemini::GeminiClient;
pub use pexels::PexelsClient;
