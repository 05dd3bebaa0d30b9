//! Per-document pipeline: source text to cards.
//!
//! ```text
//! Markdown --(comrak)--> HTML --(normalize)--> Node tree --(synthesize)--> cards
//! ```
//!
//! Each call owns its state, so documents can be processed independently.
//! Merging card lists and deduplicating media paths across documents is left
//! to the caller.

use crate::error::{ParseError, Result};
use crate::markdown;
use crate::normalize;
use crate::synth;
use crate::types::{DocumentCards, MarkdownOptions, Normalized, SourceFormat};

/// Normalize an HTML document.
pub fn parse_html(source: &str) -> Result<Normalized> {
    normalize::normalize(source)
}

/// Render and normalize a Markdown document.
pub fn parse_markdown(source: &str, options: &MarkdownOptions) -> Result<Normalized> {
    let html = markdown::render(source, options)?;
    normalize::normalize(&html)
}

/// Extract cards from a document with default Markdown options.
pub fn parse(source: &str, format: SourceFormat) -> Result<DocumentCards> {
    parse_with_options(source, format, &MarkdownOptions::default())
}

/// Extract cards from a document.
pub fn parse_with_options(
    source: &str,
    format: SourceFormat,
    options: &MarkdownOptions,
) -> Result<DocumentCards> {
    let normalized = match format {
        SourceFormat::Html => parse_html(source)?,
        SourceFormat::Markdown => parse_markdown(source, options)?,
    };
    let cards = synth::synthesize(&normalized.root);

    tracing::debug!(
        "Parsed {} document: {} cards, {} media references",
        format.as_str(),
        cards.len(),
        normalized.media_paths.len()
    );

    Ok(DocumentCards {
        cards,
        media_paths: normalized.media_paths,
    })
}

/// Extract cards, picking the format from a file extension.
pub fn parse_with_extension(source: &str, extension: &str) -> Result<DocumentCards> {
    let format = SourceFormat::from_extension(extension)
        .ok_or_else(|| ParseError::UnsupportedFormat(extension.to_string()))?;
    parse(source, format)
}
