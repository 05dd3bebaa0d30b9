//! html5ever parsing and serialization helpers.

use crate::error::{ParseError, Result};
use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Elements that start a new block. Everything else is inline content.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "dialog", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "summary",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Elements whose content never carries cards.
const IGNORED_TAGS: &[&str] = &["head", "script", "style", "template", "noscript"];

/// Parse HTML into a DOM. html5ever recovers from any malformed input.
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
}

/// The `<body>` element of a parsed document.
pub fn body(dom: &RcDom) -> Result<Handle> {
    let html = child_element(&dom.document, "html").ok_or(ParseError::MissingBody)?;
    child_element(&html, "body").ok_or(ParseError::MissingBody)
}

fn child_element(parent: &Handle, name: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| is_element(child, name))
        .cloned()
}

/// Local tag name of an element node.
pub fn tag_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_element(handle: &Handle, name: &str) -> bool {
    tag_name(handle) == Some(name)
}

/// Level of an `h1`..`h6` element.
pub fn heading_level(handle: &Handle) -> Option<u8> {
    match tag_name(handle)? {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

pub fn is_list(handle: &Handle) -> bool {
    matches!(tag_name(handle), Some("ul" | "ol"))
}

pub fn is_block(handle: &Handle) -> bool {
    tag_name(handle).is_some_and(|name| BLOCK_TAGS.contains(&name))
}

pub fn is_ignored(handle: &Handle) -> bool {
    tag_name(handle).is_some_and(|name| IGNORED_TAGS.contains(&name))
}

/// Text, comments and non-block elements.
pub fn is_inline(handle: &Handle) -> bool {
    match &handle.data {
        NodeData::Text { .. } | NodeData::Comment { .. } => true,
        NodeData::Element { .. } => !is_block(handle) && !is_ignored(handle),
        _ => false,
    }
}

pub fn is_comment(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Comment { .. })
}

/// Raw (unescaped) contents of a text node.
pub fn text(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Serialize a node including its own tag.
pub fn outer_html(handle: &Handle) -> Result<String> {
    serialize_with(handle, TraversalScope::IncludeNode)
}

/// Serialize the children of a node.
pub fn inner_html(handle: &Handle) -> Result<String> {
    serialize_with(handle, TraversalScope::ChildrenOnly(None))
}

/// Serialize a run of siblings back to back.
pub fn concat_html(run: &[Handle]) -> Result<String> {
    run.iter().map(outer_html).collect()
}

fn serialize_with(handle: &Handle, traversal_scope: TraversalScope) -> Result<String> {
    let mut bytes = Vec::new();
    let serializable: SerializableHandle = handle.clone().into();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    serialize(&mut bytes, &serializable, opts)?;
    Ok(String::from_utf8(bytes)?)
}

/// Escape text the way the serializer escapes text nodes.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}
