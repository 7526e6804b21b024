//! Error types for outline generation and deck writing.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a presentation.
///
/// Soft generation failures are not errors; they are reported through
/// [`crate::SoftFailure`] and recovered with the fallback outline.
#[derive(Error, Debug)]
pub enum Error {
    /// A request was rejected before any network call was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level failure talking to a remote service.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A remote service answered, but not with something usable.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Failed to read or write the deck's file system or stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML reading or writing error (for PPTX).
    #[error("XML error: {0}")]
    Xml(String),

    /// Failed to interpret a structured payload.
    #[error("Parse error: {0}")]
    Parse(String),
}
