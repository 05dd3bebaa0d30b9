//! Core types for outline card extraction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directional marker separating the two sides of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelimiterKind {
    /// `::` - studied in both directions.
    TwoWay,
    /// `?::` - question precedes the delimiter, answer follows.
    AnswerFirst,
    /// `::?` - answer precedes the delimiter, question follows.
    QuestionFirst,
}

impl DelimiterKind {
    /// All markers, longest first so `::?` and `?::` win over `::`.
    pub const ALL: [DelimiterKind; 3] = [Self::QuestionFirst, Self::AnswerFirst, Self::TwoWay];

    /// The marker as written in source documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoWay => "::",
            Self::AnswerFirst => "?::",
            Self::QuestionFirst => "::?",
        }
    }

    /// Parse a marker.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "::" => Some(Self::TwoWay),
            "?::" => Some(Self::AnswerFirst),
            "::?" => Some(Self::QuestionFirst),
            _ => None,
        }
    }
}

impl fmt::Display for DelimiterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized document tree.
///
/// Text payloads are markup strings carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// A heading, or a list item introducing a nested list.
    Section { heading: String, children: Vec<Node> },
    /// A single item holding both sides around one delimiter.
    Qa {
        before: String,
        delimiter: DelimiterKind,
        after: String,
    },
    /// One side of a card; the other side is the enclosing section heading.
    Standalone { delimiter: DelimiterKind, text: String },
    /// Text containing cloze markers.
    Cloze { text: String },
    /// Sequence of nodes without a shared heading.
    List { items: Vec<Node> },
}

impl Node {
    /// Build a section node.
    pub fn section(heading: impl Into<String>, children: Vec<Node>) -> Self {
        Self::Section {
            heading: heading.into(),
            children,
        }
    }

    /// Build a question/answer node.
    pub fn qa(before: impl Into<String>, delimiter: DelimiterKind, after: impl Into<String>) -> Self {
        Self::Qa {
            before: before.into(),
            delimiter,
            after: after.into(),
        }
    }

    /// Build a standalone node.
    pub fn standalone(delimiter: DelimiterKind, text: impl Into<String>) -> Self {
        Self::Standalone {
            delimiter,
            text: text.into(),
        }
    }

    /// Build a cloze node.
    pub fn cloze(text: impl Into<String>) -> Self {
        Self::Cloze { text: text.into() }
    }
}

/// Headings enclosing a card, outermost first.
///
/// Extending a path returns a new value, so sibling subtrees never observe
/// each other's segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<String>);

impl Path {
    /// The empty root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// A new path with `segment` appended.
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend(self.0.iter().cloned());
        segments.push(segment.into());
        Self(segments)
    }

    /// Nearest heading and the path above it.
    pub fn split_last(&self) -> (Option<&str>, Path) {
        match self.0.split_last() {
            Some((last, parent)) => (Some(last.as_str()), Self(parent.to_vec())),
            None => (None, Self::root()),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" > "))
    }
}

/// Question/answer card.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BasicCard {
    pub question: String,
    pub answer: String,
    pub path: Path,
    /// Study answer -> question as well.
    pub reverse: bool,
}

/// Cloze deletion card.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClozeCard {
    pub question: String,
    pub path: Path,
}

/// Card extracted from a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Card {
    Basic(BasicCard),
    Cloze(ClozeCard),
}

impl Card {
    pub fn path(&self) -> &Path {
        match self {
            Self::Basic(card) => &card.path,
            Self::Cloze(card) => &card.path,
        }
    }

    /// Whether both study directions should be generated.
    pub fn is_reversible(&self) -> bool {
        matches!(self, Self::Basic(card) if card.reverse)
    }
}

impl From<BasicCard> for Card {
    fn from(card: BasicCard) -> Self {
        Self::Basic(card)
    }
}

impl From<ClozeCard> for Card {
    fn from(card: ClozeCard) -> Self {
        Self::Cloze(card)
    }
}

/// Source document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFormat {
    Html,
    Markdown,
}

impl SourceFormat {
    /// Pick a format from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
        }
    }
}

/// Markdown renderer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Parse `$...$` and `$$...$$` and emit `\(...\)` / `\[...\]`.
    pub math: bool,
    /// Parse `{key="value"}` suffixes on images.
    pub inline_attributes: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            math: true,
            inline_attributes: true,
        }
    }
}

/// Normalizer output for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalized {
    /// Always a [`Node::List`].
    pub root: Node,
    /// Original media references in document order, duplicates kept.
    pub media_paths: Vec<String>,
}

/// Cards and media references extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentCards {
    pub cards: Vec<Card>,
    pub media_paths: Vec<String>,
}
