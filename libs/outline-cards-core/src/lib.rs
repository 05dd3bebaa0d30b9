//! Flashcard extraction from outlined notes.
//!
//! Provides:
//! - Delimiter grammar for `::`, `?::`, `::?` and `{{cN::...}}` markers
//! - HTML normalizer producing a typed node tree and media references
//! - Markdown front-end rendering to HTML (math, inline attributes)
//! - Card synthesizer tagging each card with its heading path
//! - Shared types (Node, Card, Path, etc.)

pub mod error;
pub mod grammar;
pub mod markdown;
pub mod normalize;
pub mod parser;
pub mod synth;
pub mod types;

pub use error::{ParseError, Result};
pub use grammar::{classify, Fragment};
pub use normalize::normalize;
pub use parser::{parse, parse_html, parse_markdown, parse_with_extension, parse_with_options};
pub use synth::{synthesize, synthesize_into};
pub use types::{
    BasicCard, Card, ClozeCard, DelimiterKind, DocumentCards, MarkdownOptions, Node, Normalized,
    Path, SourceFormat,
};
