//! HTML document normalizer.
//!
//! Reduces rendered HTML to a [`Node`] tree:
//!
//! - A heading owns every following sibling up to the next heading of the
//!   same or higher rank. Headings partition their sibling list; DOM nesting
//!   does not matter.
//! - A list item with a nested list becomes a section labelled by the
//!   content before the nested list.
//! - A run of inline siblings (text, comments and non-block elements) is
//!   classified with the [`grammar`](crate::grammar). Markup around the
//!   matched text fragment is carried into the card fields.
//! - Any other element is transparent.
//!
//! Media references are rewritten to bare file names before extraction so
//! card fields carry the rewritten markup.

pub mod markup;
pub mod media;

use crate::error::Result;
use crate::grammar::{self, Fragment};
use crate::types::{Node, Normalized};
use markup5ever_rcdom::Handle;

/// Normalize an HTML document.
pub fn normalize(html: &str) -> Result<Normalized> {
    let dom = markup::parse_html(html);

    let mut media_paths = Vec::new();
    media::rewrite_media(&dom.document, &mut media_paths);

    let body = markup::body(&dom)?;
    let children = body.children.borrow();
    let items = extract(&children)?;

    Ok(Normalized {
        root: Node::List { items },
        media_paths,
    })
}

fn extract(siblings: &[Handle]) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();
    let mut idx = 0;

    while idx < siblings.len() {
        let sibling = &siblings[idx];

        if let Some(level) = markup::heading_level(sibling) {
            let end = siblings[idx + 1..]
                .iter()
                .position(|s| !is_nested_under(level, s))
                .map_or(siblings.len(), |offset| idx + 1 + offset);
            let heading = markup::inner_html(sibling)?;
            let children = extract(&siblings[idx + 1..end])?;
            nodes.push(Node::section(heading.trim(), children));
            idx = end;
        } else if markup::is_inline(sibling) {
            let end = idx + siblings[idx..].iter().take_while(|s| markup::is_inline(s)).count();
            nodes.extend(inline_run(&siblings[idx..end])?);
            idx = end;
        } else if markup::is_element(sibling, "li") {
            nodes.extend(list_item(sibling)?);
            idx += 1;
        } else if markup::is_ignored(sibling) {
            idx += 1;
        } else {
            nodes.extend(extract(&sibling.children.borrow())?);
            idx += 1;
        }
    }

    Ok(nodes)
}

/// Whether `element` belongs under a heading of `level`.
fn is_nested_under(level: u8, element: &Handle) -> bool {
    markup::heading_level(element).map_or(true, |l| l > level)
}

fn list_item(item: &Handle) -> Result<Vec<Node>> {
    let children = item.children.borrow();
    let split = children
        .iter()
        .position(markup::is_list)
        .unwrap_or(children.len());
    let (head, tail) = children.split_at(split);

    if tail.is_empty() {
        return extract(head);
    }

    match list_heading(head)? {
        Some(heading) => Ok(vec![Node::section(heading, extract(tail)?)]),
        None => {
            tracing::debug!("Skipping nested list without a usable label");
            Ok(Vec::new())
        }
    }
}

/// Label for a list item that introduces a nested list.
fn list_heading(head: &[Handle]) -> Result<Option<String>> {
    let plain = head
        .iter()
        .all(|h| markup::text(h).is_some() || markup::is_comment(h));

    let heading = if plain {
        let text: String = head.iter().filter_map(markup::text).collect();
        markup::escape_text(text.trim())
    } else {
        let source = head
            .iter()
            .find(|h| markup::is_element(h, "p"))
            .or_else(|| head.iter().find(|h| markup::is_block(h)));
        match source {
            Some(element) => markup::inner_html(element)?.trim().to_string(),
            None => return Ok(None),
        }
    };

    Ok((!heading.is_empty()).then_some(heading))
}

/// Classify a run of inline siblings.
///
/// Cloze markers anywhere in the run claim the whole run. Otherwise the
/// first text fragment holding a delimiter splits the run. Failing both,
/// inline elements are searched on their own.
fn inline_run(run: &[Handle]) -> Result<Vec<Node>> {
    let joined = markup::concat_html(run)?;
    if grammar::is_cloze(&joined) {
        return Ok(vec![Node::cloze(joined.trim())]);
    }

    for (k, sibling) in run.iter().enumerate() {
        let Some(text) = markup::text(sibling) else {
            continue;
        };

        let node = match grammar::classify(&text) {
            None => continue,
            Some(Fragment::Cloze) => Node::cloze(joined.trim()),
            Some(Fragment::Standalone { delimiter, rest }) => {
                let preceding = content_html(&run[..k])?;
                let following = markup::concat_html(&run[k + 1..])?;
                let side = format!("{}{}", markup::escape_text(rest), following);
                if preceding.trim().is_empty() {
                    Node::standalone(delimiter, side.trim())
                } else {
                    Node::qa(preceding.trim(), delimiter, side.trim())
                }
            }
            Some(Fragment::Basic {
                before,
                delimiter,
                after,
            }) => {
                let preceding = content_html(&run[..k])?;
                let following = markup::concat_html(&run[k + 1..])?;
                let before = format!("{}{}", preceding, markup::escape_text(before));
                let after = format!("{}{}", markup::escape_text(after), following);
                Node::qa(before.trim(), delimiter, after.trim())
            }
        };
        return Ok(vec![node]);
    }

    let mut nodes = Vec::new();
    for sibling in run.iter().filter(|s| markup::tag_name(s).is_some()) {
        nodes.extend(extract(&sibling.children.borrow())?);
    }
    Ok(nodes)
}

/// Markup of a run with comments left out.
fn content_html(run: &[Handle]) -> Result<String> {
    run.iter()
        .filter(|h| !markup::is_comment(h))
        .map(markup::outer_html)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DelimiterKind::{AnswerFirst, QuestionFirst, TwoWay};
    use pretty_assertions::assert_eq;

    fn items(html: &str) -> Vec<Node> {
        match normalize(html).unwrap().root {
            Node::List { items } => items,
            other => panic!("expected list root, got {other:?}"),
        }
    }

    #[test]
    fn is_nested_under_compares_heading_rank() {
        let dom = markup::parse_html("<h3>Header 3</h3><p>x</p>");
        let body = markup::body(&dom).unwrap();
        let children = body.children.borrow();
        assert!(is_nested_under(2, &children[0]));
        assert!(!is_nested_under(3, &children[0]));
        assert!(!is_nested_under(4, &children[0]));
        assert!(is_nested_under(1, &children[1]));
    }

    #[test]
    fn nested_headers() {
        let html = "<h1>Header A-1</h1>\n\n<h2>Header A-2</h2>\n\n<h1>Header B-1</h1>\n";
        assert_eq!(
            items(html),
            vec![
                Node::section("Header A-1", vec![Node::section("Header A-2", vec![])]),
                Node::section("Header B-1", vec![]),
            ]
        );
    }

    #[test]
    fn headers_skipping_levels_still_partition() {
        let html = "<h1>A</h1><h3>B</h3><ul><li>Q ?:: R</li></ul><h2>C</h2><h1>D</h1>";
        assert_eq!(
            items(html),
            vec![
                Node::section(
                    "A",
                    vec![
                        Node::section("B", vec![Node::qa("Q", AnswerFirst, "R")]),
                        Node::section("C", vec![]),
                    ]
                ),
                Node::section("D", vec![]),
            ]
        );
    }

    #[test]
    fn header_with_markup() {
        assert_eq!(
            items("<h1>Header <em>A</em></h1>"),
            vec![Node::section("Header <em>A</em>", vec![])]
        );
    }

    #[test]
    fn list_of_delimiters() {
        let html = "<ul>\n<li>A :: B</li>\n<li>C ?:: D</li>\n<li>E ::? F</li>\n</ul>";
        assert_eq!(
            items(html),
            vec![
                Node::qa("A", TwoWay, "B"),
                Node::qa("C", AnswerFirst, "D"),
                Node::qa("E", QuestionFirst, "F"),
            ]
        );
    }

    #[test]
    fn list_with_paragraph() {
        assert_eq!(
            items("<ul><li><p>A :: B</p></li></ul>"),
            vec![Node::qa("A", TwoWay, "B")]
        );
    }

    #[test]
    fn list_with_inline_markup() {
        assert_eq!(
            items("<ul><li><p>A <i>italic</i> :: B <strong>strong</strong></p></li></ul>"),
            vec![Node::qa(
                "A <i>italic</i>",
                TwoWay,
                "B <strong>strong</strong>"
            )]
        );
    }

    #[test]
    fn delimiter_inside_inline_element() {
        assert_eq!(
            items("<ul><li><strong>Q :: A</strong></li></ul>"),
            vec![Node::qa("Q", TwoWay, "A")]
        );
    }

    #[test]
    fn list_with_image() {
        assert_eq!(
            items("<ul><li>A ?:: B<br><img src=\"image.png\"></li></ul>"),
            vec![Node::qa("A", AnswerFirst, "B<br><img src=\"image.png\">")]
        );
    }

    #[test]
    fn list_with_cloze() {
        assert_eq!(
            items("<ul><li>Cloze {{c1::deletion}}</li></ul>"),
            vec![Node::cloze("Cloze {{c1::deletion}}")]
        );
    }

    #[test]
    fn cloze_with_markup_inside() {
        assert_eq!(
            items("<ul><li>Cloze {{c1::<sup>deletion</sup>}}</li></ul>"),
            vec![Node::cloze("Cloze {{c1::<sup>deletion</sup>}}")]
        );
    }

    #[test]
    fn cloze_merges_surrounding_siblings() {
        assert_eq!(
            items("<ul><li>Cloze {{c1::deletion}}<br><img src=\"image.png\"></li></ul>"),
            vec![Node::cloze("Cloze {{c1::deletion}}<br><img src=\"image.png\">")]
        );
        assert_eq!(
            items("<ul><li><img src=\"image.png\"><br>Cloze {{c1::deletion}}</li></ul>"),
            vec![Node::cloze("<img src=\"image.png\"><br>Cloze {{c1::deletion}}")]
        );
    }

    #[test]
    fn cloze_wins_over_delimiters() {
        assert_eq!(
            items("<ul><li>Capital :: {{c1::Paris}}</li></ul>"),
            vec![Node::cloze("Capital :: {{c1::Paris}}")]
        );
    }

    #[test]
    fn strips_path_from_image() {
        let normalized = normalize("<li>Question ?:: Answer <img src=\"foo/bar.png\"/></li>").unwrap();
        assert_eq!(
            normalized.root,
            Node::List {
                items: vec![Node::qa("Question", AnswerFirst, "Answer <img src=\"bar.png\">")]
            }
        );
        assert_eq!(normalized.media_paths, ["foo/bar.png"]);
    }

    #[test]
    fn nested_list() {
        let html = "<ul>\n<li>\n<p>A</p>\n<ul>\n<li>B :: C</li>\n</ul>\n</li>\n</ul>";
        assert_eq!(
            items(html),
            vec![Node::section("A", vec![Node::qa("B", TwoWay, "C")])]
        );
    }

    #[test]
    fn nested_list_without_paragraph() {
        let html = "<ul>\n<li>\n  A\n  <ul>\n<li>B :: C</li>\n</ul>\n</li>\n</ul>";
        assert_eq!(
            items(html),
            vec![Node::section("A", vec![Node::qa("B", TwoWay, "C")])]
        );
    }

    #[test]
    fn multiple_nested_lists() {
        let html = "<ul>\
            <li><p>List 1</p><ul><li>Question 1 ?:: Answer 1</li></ul></li>\
            <li><p>List 2</p><ul><li>Question 2 ?:: Answer 2</li></ul></li>\
            </ul>";
        assert_eq!(
            items(html),
            vec![
                Node::section("List 1", vec![Node::qa("Question 1", AnswerFirst, "Answer 1")]),
                Node::section("List 2", vec![Node::qa("Question 2", AnswerFirst, "Answer 2")]),
            ]
        );
    }

    #[test]
    fn nested_list_and_standalone_answer() {
        let html = "<ul><li><p>Question</p><ul><li>?:: Standalone answer</li></ul></li></ul>";
        assert_eq!(
            items(html),
            vec![Node::section(
                "Question",
                vec![Node::standalone(AnswerFirst, "Standalone answer")]
            )]
        );
    }

    #[test]
    fn nested_list_labelled_by_image() {
        let html = "<ul><li><p><img src=\"bar.png\"/></p><ul><li>Question ?:: Answer</li></ul></li></ul>";
        assert_eq!(
            items(html),
            vec![Node::section(
                "<img src=\"bar.png\">",
                vec![Node::qa("Question", AnswerFirst, "Answer")]
            )]
        );
    }

    #[test]
    fn nested_list_without_label_is_skipped() {
        let html = "<ul><li>Before</li><li><em>inline</em> only<ul><li>B :: C</li></ul></li><li>D :: E</li></ul>";
        assert_eq!(
            items(html),
            vec![Node::qa("D", TwoWay, "E")]
        );
    }

    #[test]
    fn header_and_standalone_items() {
        for (marker, kind) in [("?::", AnswerFirst), ("::?", QuestionFirst), ("::", TwoWay)] {
            let html = format!("<h1>Header</h1>\n<ul>\n<li>{marker} Standalone</li>\n</ul>");
            assert_eq!(
                items(&html),
                vec![Node::section("Header", vec![Node::standalone(kind, "Standalone")])]
            );
        }
    }

    #[test]
    fn standalone_marker_after_markup_becomes_qa() {
        assert_eq!(
            items("<ul><li><b>Q</b> ?:: A</li></ul>"),
            vec![Node::qa("<b>Q</b>", AnswerFirst, "A")]
        );
    }

    #[test]
    fn comments_before_markers_are_dropped() {
        assert_eq!(
            items("<h1>Q</h1><ul><li><!-- c -->?:: A</li></ul>"),
            vec![Node::section("Q", vec![Node::standalone(AnswerFirst, "A")])]
        );
        assert_eq!(
            items("<ul><li><!-- c -->A :: B</li></ul>"),
            vec![Node::qa("A", TwoWay, "B")]
        );
    }

    #[test]
    fn inline_math() {
        assert_eq!(
            items("<ul><li>Question ?:: Answer \\(\\sin^2\\)</li></ul>"),
            vec![Node::qa("Question", AnswerFirst, "Answer \\(\\sin^2\\)")]
        );
    }

    #[test]
    fn block_math() {
        let html = "<ul>\n<li>Question ?::\nAnswer\n\\[\n\\sin^2\n\\]\n</li>\n</ul>";
        assert_eq!(
            items(html),
            vec![Node::qa("Question", AnswerFirst, "Answer\n\\[\n\\sin^2\n\\]")]
        );
    }

    #[test]
    fn escapes_text_around_delimiters() {
        assert_eq!(
            items("<ul><li>a &lt; b :: b &gt; a</li></ul>"),
            vec![Node::qa("a &lt; b", TwoWay, "b &gt; a")]
        );
    }

    #[test]
    fn ignores_script_and_style() {
        assert_eq!(
            items("<style>p::before { content: 'x'; }</style><ul><li>A :: B</li></ul>"),
            vec![Node::qa("A", TwoWay, "B")]
        );
    }

    #[test]
    fn plain_text_without_delimiters_yields_nothing() {
        assert_eq!(items("<h1>Notes</h1><p>Nothing to learn here.</p>"), vec![Node::section("Notes", vec![])]);
    }
}
