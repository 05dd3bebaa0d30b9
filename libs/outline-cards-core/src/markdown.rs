//! Markdown front-end.
//!
//! Renders Markdown to HTML with comrak before normalization. Two passes run
//! over the comrak AST before rendering:
//!
//! - math: `$x$` and `$$x$$` become the text `\(x\)` and `\[x\]`
//! - inline attributes: `![alt](src){width="150" .class #id}` becomes an
//!   `<img>` carrying the listed attributes

use crate::error::{ParseError, Result};
use crate::types::MarkdownOptions;
use comrak::nodes::{AstNode, NodeValue};
use comrak::{format_html, parse_document, Arena, Options};
use once_cell::sync::Lazy;
use regex::Regex;

static ATTRIBUTE_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\{([^{}\n]*)\}").expect("attribute block pattern"));

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)=(?:"([^"]*)"|'([^']*)'|([^\s"'}]+))|([.#])([-A-Za-z0-9_]+)"#,
    )
    .expect("attribute pattern")
});

/// Render Markdown to HTML.
pub fn render(source: &str, options: &MarkdownOptions) -> Result<String> {
    let arena = Arena::new();
    let comrak_options = comrak_options(options);
    let root = parse_document(&arena, source, &comrak_options);

    if options.math {
        convert_math(root);
    }
    if options.inline_attributes {
        apply_image_attributes(root);
    }

    let mut html = Vec::new();
    format_html(root, &comrak_options, &mut html).map_err(ParseError::Render)?;
    Ok(String::from_utf8(html)?)
}

fn comrak_options(options: &MarkdownOptions) -> Options<'static> {
    let mut comrak_options = Options::default();
    comrak_options.extension.table = true;
    comrak_options.extension.strikethrough = true;
    comrak_options.extension.math_dollars = options.math;
    // Raw HTML must pass through; the attribute pass emits it.
    comrak_options.render.unsafe_ = true;
    comrak_options
}

fn convert_math<'a>(root: &'a AstNode<'a>) {
    for node in root.descendants() {
        let mut ast = node.data.borrow_mut();
        let text = match &ast.value {
            NodeValue::Math(math) if math.display_math => format!("\\[{}\\]", math.literal),
            NodeValue::Math(math) => format!("\\({}\\)", math.literal),
            _ => continue,
        };
        ast.value = NodeValue::Text(text.into());
    }
}

fn apply_image_attributes<'a>(root: &'a AstNode<'a>) {
    let images: Vec<_> = root
        .descendants()
        .filter(|node| matches!(node.data.borrow().value, NodeValue::Image(_)))
        .collect();

    for image in images {
        let Some(next) = image.next_sibling() else {
            continue;
        };

        let (attributes, remainder) = {
            let ast = next.data.borrow();
            let NodeValue::Text(text) = &ast.value else {
                continue;
            };
            let text: &str = text;
            let Some(found) = ATTRIBUTE_BLOCK.captures(text) else {
                continue;
            };
            let end = found.get(0).map_or(0, |m| m.end());
            (parse_attributes(&found[1]), text[end..].to_string())
        };

        let Some(html) = image_html(image, &attributes) else {
            continue;
        };

        if remainder.is_empty() {
            next.detach();
        } else {
            next.data.borrow_mut().value = NodeValue::Text(remainder.into());
        }
        for child in image.children().collect::<Vec<_>>() {
            child.detach();
        }
        image.data.borrow_mut().value = NodeValue::HtmlInline(html);
    }
}

/// Parse the inside of a `{...}` attribute block.
fn parse_attributes(block: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let mut classes = Vec::new();

    for caps in ATTRIBUTE.captures_iter(block) {
        if let Some(name) = caps.get(1) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            attributes.push((name.as_str().to_string(), value.to_string()));
        } else if let (Some(sigil), Some(value)) = (caps.get(5), caps.get(6)) {
            match sigil.as_str() {
                "." => classes.push(value.as_str().to_string()),
                _ => attributes.push(("id".to_string(), value.as_str().to_string())),
            }
        }
    }

    if !classes.is_empty() {
        attributes.push(("class".to_string(), classes.join(" ")));
    }
    attributes
}

fn image_html<'a>(image: &'a AstNode<'a>, attributes: &[(String, String)]) -> Option<String> {
    let (url, title) = match &image.data.borrow().value {
        NodeValue::Image(link) => (link.url.clone(), link.title.clone()),
        _ => return None,
    };

    let alt: String = image
        .descendants()
        .skip(1)
        .filter_map(|node| match &node.data.borrow().value {
            NodeValue::Text(text) => Some(text.to_string()),
            NodeValue::Code(code) => Some(code.literal.clone()),
            _ => None,
        })
        .collect();

    let mut html = format!(
        r#"<img src="{}" alt="{}""#,
        escape_attribute(&url),
        escape_attribute(&alt)
    );
    if !title.is_empty() {
        html.push_str(&format!(r#" title="{}""#, escape_attribute(&title)));
    }
    for (name, value) in attributes {
        html.push_str(&format!(r#" {}="{}""#, name, escape_attribute(value)));
    }
    html.push_str(" />");
    Some(html)
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
