//! Error types for outline-cards-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that abort processing of a whole document.
///
/// Malformed card context (a standalone item without a heading, a nested list
/// without a usable label) is degraded locally and never reported here.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to serialize markup: {0}")]
    Markup(#[from] std::io::Error),

    #[error("serialized markup is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("markdown rendering failed: {0}")]
    Render(std::io::Error),

    #[error("parsed document has no body element")]
    MissingBody,

    #[error("unsupported source extension: {0}")]
    UnsupportedFormat(String),
}
