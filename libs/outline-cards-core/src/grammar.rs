//! Delimiter grammar for text fragments.
//!
//! A fragment is classified by the first matcher in [`MATCHERS`] that
//! accepts it:
//!
//! 1. cloze: contains `{{c<digits>::...}}`
//! 2. standalone: starts with `::?`, `?::` or `::` followed by whitespace
//! 3. basic: contains a marker with text on either side
//!
//! The order is significant. A cloze fragment is never split on its `::`.

use crate::types::DelimiterKind;
use once_cell::sync::Lazy;
use regex::Regex;

static CLOZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{\{c\d+::.*?\}\}").expect("cloze pattern"));

static STANDALONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(::\?|\?::|::)(?:\s+(.*))?$").expect("standalone pattern"));

static BASIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.*?)\s*(::\?|\?::|::)\s*(.*)$").expect("basic pattern"));

/// Classified fragment. Slices borrow from the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment<'a> {
    Cloze,
    Standalone {
        delimiter: DelimiterKind,
        rest: &'a str,
    },
    Basic {
        before: &'a str,
        delimiter: DelimiterKind,
        after: &'a str,
    },
}

/// A predicate and extractor pair for one rule of the grammar.
pub struct Matcher {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub extract: for<'a> fn(&'a str) -> Option<Fragment<'a>>,
}

/// Rules in priority order.
pub static MATCHERS: [Matcher; 3] = [
    Matcher {
        name: "cloze",
        matches: is_cloze,
        extract: extract_cloze,
    },
    Matcher {
        name: "standalone",
        matches: is_standalone,
        extract: extract_standalone,
    },
    Matcher {
        name: "basic",
        matches: is_basic,
        extract: extract_basic,
    },
];

/// Classify a fragment, or `None` for plain text.
pub fn classify(text: &str) -> Option<Fragment<'_>> {
    MATCHERS
        .iter()
        .filter(|m| (m.matches)(text))
        .find_map(|m| (m.extract)(text))
}

pub fn is_cloze(text: &str) -> bool {
    CLOZE.is_match(text)
}

fn extract_cloze(text: &str) -> Option<Fragment<'_>> {
    is_cloze(text).then_some(Fragment::Cloze)
}

pub fn is_standalone(text: &str) -> bool {
    STANDALONE.is_match(text.trim_start())
}

fn extract_standalone(text: &str) -> Option<Fragment<'_>> {
    let caps = STANDALONE.captures(text.trim_start())?;
    let delimiter = DelimiterKind::from_str(caps.get(1)?.as_str())?;
    let rest = caps.get(2).map_or("", |m| m.as_str());
    Some(Fragment::Standalone { delimiter, rest })
}

pub fn is_basic(text: &str) -> bool {
    BASIC.is_match(text)
}

fn extract_basic(text: &str) -> Option<Fragment<'_>> {
    let caps = BASIC.captures(text)?;
    let delimiter = DelimiterKind::from_str(caps.get(2)?.as_str())?;
    Some(Fragment::Basic {
        before: caps.get(1)?.as_str(),
        delimiter,
        after: caps.get(3)?.as_str(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn matchers_are_in_priority_order() {
        let names: Vec<_> = MATCHERS.iter().map(|m| m.name).collect();
        assert_eq!(names, ["cloze", "standalone", "basic"]);
    }

    #[test]
    fn plain_text_is_unclassified() {
        assert_eq!(classify("Just a heading"), None);
        assert_eq!(classify("a single : colon"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn basic_two_way() {
        assert_eq!(
            classify("A :: B"),
            Some(Fragment::Basic {
                before: "A",
                delimiter: DelimiterKind::TwoWay,
                after: "B",
            })
        );
    }

    #[test]
    fn basic_markers_are_not_split() {
        assert_eq!(
            classify("C ?:: D"),
            Some(Fragment::Basic {
                before: "C",
                delimiter: DelimiterKind::AnswerFirst,
                after: "D",
            })
        );
        assert_eq!(
            classify("E ::? F"),
            Some(Fragment::Basic {
                before: "E",
                delimiter: DelimiterKind::QuestionFirst,
                after: "F",
            })
        );
    }

    #[test]
    fn basic_first_marker_wins() {
        assert_eq!(
            classify("a :: b ?:: c"),
            Some(Fragment::Basic {
                before: "a",
                delimiter: DelimiterKind::TwoWay,
                after: "b ?:: c",
            })
        );
    }

    #[test]
    fn basic_spans_lines() {
        assert_eq!(
            classify("Question ?::\nAnswer\n\\[\n\\sin^2\n\\]\n"),
            Some(Fragment::Basic {
                before: "Question",
                delimiter: DelimiterKind::AnswerFirst,
                after: "Answer\n\\[\n\\sin^2\n\\]\n",
            })
        );
    }

    #[test]
    fn standalone_markers() {
        assert_eq!(
            classify("?:: Standalone answer"),
            Some(Fragment::Standalone {
                delimiter: DelimiterKind::AnswerFirst,
                rest: "Standalone answer",
            })
        );
        assert_eq!(
            classify("  ::? Standalone question"),
            Some(Fragment::Standalone {
                delimiter: DelimiterKind::QuestionFirst,
                rest: "Standalone question",
            })
        );
        assert_eq!(
            classify(":: Two-way"),
            Some(Fragment::Standalone {
                delimiter: DelimiterKind::TwoWay,
                rest: "Two-way",
            })
        );
    }

    #[test]
    fn standalone_with_empty_first_line() {
        assert_eq!(
            classify("?::"),
            Some(Fragment::Standalone {
                delimiter: DelimiterKind::AnswerFirst,
                rest: "",
            })
        );
        assert_eq!(
            classify("?::\nAnswer"),
            Some(Fragment::Standalone {
                delimiter: DelimiterKind::AnswerFirst,
                rest: "Answer",
            })
        );
    }

    #[test]
    fn standalone_requires_whitespace() {
        assert!(!is_standalone("::x"));
        assert_eq!(
            classify("::x"),
            Some(Fragment::Basic {
                before: "",
                delimiter: DelimiterKind::TwoWay,
                after: "x",
            })
        );
    }

    #[test]
    fn cloze_takes_precedence() {
        assert_eq!(classify("Cloze {{c1::deletion}}"), Some(Fragment::Cloze));
        assert_eq!(classify("A :: {{c12::B}}"), Some(Fragment::Cloze));
        assert_eq!(classify("?:: {{c2::answer}}"), Some(Fragment::Cloze));
    }

    #[test]
    fn cloze_body_may_contain_markup() {
        assert!(is_cloze("Cloze {{c1::<sup>deletion</sup>}}"));
        assert!(!is_cloze("Cloze {{c1::"));
        assert!(!is_cloze("{{c::missing digits}}"));
    }
}
