//! Card synthesis from normalized trees.
//!
//! | Node | Card |
//! |---|---|
//! | `Section` | recurse with the heading appended to the path |
//! | `Cloze` | cloze card at the current path |
//! | `Standalone` | nearest heading supplies the missing side, path drops it |
//! | `Qa` | both sides from the node, current path |
//!
//! `::` yields a reversible card; `?::` and `::?` only fix which side is the
//! question.

use crate::types::{BasicCard, Card, ClozeCard, DelimiterKind, Node, Path};

/// Synthesize all cards below `root`, in document order.
pub fn synthesize(root: &Node) -> Vec<Card> {
    let mut cards = Vec::new();
    synthesize_into(root, &Path::root(), &mut cards);
    cards
}

/// Append the cards below `node`, found at `path`, to `cards`.
pub fn synthesize_into(node: &Node, path: &Path, cards: &mut Vec<Card>) {
    match node {
        Node::List { items } => {
            for item in items {
                synthesize_into(item, path, cards);
            }
        }
        Node::Section { heading, children } => {
            let path = path.join(heading.as_str());
            for child in children {
                synthesize_into(child, &path, cards);
            }
        }
        Node::Cloze { text } => cards.push(
            ClozeCard {
                question: text.clone(),
                path: path.clone(),
            }
            .into(),
        ),
        Node::Standalone { delimiter, text } => {
            cards.push(standalone_card(*delimiter, text, path).into())
        }
        Node::Qa {
            before,
            delimiter,
            after,
        } => cards.push(qa_card(before, *delimiter, after, path).into()),
    }
}

fn standalone_card(delimiter: DelimiterKind, text: &str, path: &Path) -> BasicCard {
    let (heading, parent) = path.split_last();
    let heading = match heading {
        Some(heading) => heading.to_string(),
        None => {
            tracing::warn!("Standalone {} item has no enclosing heading: {}", delimiter, text);
            String::new()
        }
    };
    let text = text.to_string();

    let (question, answer, reverse) = match delimiter {
        DelimiterKind::TwoWay => (heading, text, true),
        DelimiterKind::AnswerFirst => (heading, text, false),
        DelimiterKind::QuestionFirst => (text, heading, false),
    };

    BasicCard {
        question,
        answer,
        path: parent,
        reverse,
    }
}

fn qa_card(before: &str, delimiter: DelimiterKind, after: &str, path: &Path) -> BasicCard {
    let (before, after) = (before.to_string(), after.to_string());

    let (question, answer, reverse) = match delimiter {
        DelimiterKind::TwoWay => (before, after, true),
        DelimiterKind::AnswerFirst => (before, after, false),
        DelimiterKind::QuestionFirst => (after, before, false),
    };

    BasicCard {
        question,
        answer,
        path: path.clone(),
        reverse,
    }
}
