//! Seams to the remote services a generation request depends on.

use crate::error::Result;
use crate::types::SlideImage;

/// A generative-language model that answers a single text prompt.
pub trait LanguageModel: Send + Sync {
    /// Send a prompt and return the response text.
    ///
    /// `Ok(None)` means the model answered without any text.
    fn generate_text(&self, prompt: &str) -> Result<Option<String>>;
}

/// A source of stock pictures keyed by a search query.
pub trait ImageSource: Send + Sync {
    /// Find one picture for the query.
    ///
    /// Every failure is reported as `None`; callers never see an error.
    fn find_image(&self, query: &str) -> Option<SlideImage>;
}
