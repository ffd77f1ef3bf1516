//! Inline span resolver.
//!
//! Splits a single line of block text into typed spans. Matching is repeated
//! extraction: pick a pattern match in the remaining text, emit any text before
//! it, emit the typed span, continue after the match.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::types::{Inline, InlineMatching};

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static STRIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(.*?)~~").unwrap());
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").unwrap());
static LINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

#[derive(Debug, Clone, Copy)]
enum Pattern {
    Bold,
    Italic,
    Strike,
    Code,
    Link,
}

/// Patterns in the order they are tried.
const PRIORITY: [Pattern; 5] = [
    Pattern::Bold,
    Pattern::Italic,
    Pattern::Strike,
    Pattern::Code,
    Pattern::Link,
];

impl Pattern {
    fn regex(self) -> &'static Regex {
        match self {
            Pattern::Bold => &BOLD_RE,
            Pattern::Italic => &ITALIC_RE,
            Pattern::Strike => &STRIKE_RE,
            Pattern::Code => &CODE_RE,
            Pattern::Link => &LINK_RE,
        }
    }

    fn to_inline(self, caps: &Captures<'_>) -> Inline {
        let content = caps[1].to_string();
        match self {
            Pattern::Bold => Inline::Bold { content },
            Pattern::Italic => Inline::Italic { content },
            Pattern::Strike => Inline::Strike { content },
            Pattern::Code => Inline::Code { content },
            Pattern::Link => Inline::Link {
                content,
                url: caps[2].to_string(),
            },
        }
    }
}

/// Resolve a line into inline spans using priority matching.
///
/// A later bold marker is preferred over an earlier link; see
/// [`InlineMatching::Priority`].
pub fn resolve_inline(line: &str) -> Vec<Inline> {
    resolve_inline_with(line, InlineMatching::Priority)
}

/// Resolve a line into inline spans with the given matching strategy.
///
/// Empty input yields no spans. Text with no markup yields a single `Text`.
pub fn resolve_inline_with(line: &str, matching: InlineMatching) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = line;

    while !rest.is_empty() {
        let Some((pattern, caps)) = next_match(rest, matching) else {
            spans.push(Inline::Text {
                content: rest.to_string(),
            });
            break;
        };

        let whole = caps.get_match();
        if whole.start() > 0 {
            spans.push(Inline::Text {
                content: rest[..whole.start()].to_string(),
            });
        }
        spans.push(pattern.to_inline(&caps));
        rest = &rest[whole.end()..];
    }

    spans
}

fn next_match(text: &str, matching: InlineMatching) -> Option<(Pattern, Captures<'_>)> {
    let mut candidates = PRIORITY
        .iter()
        .filter_map(|&pattern| pattern.regex().captures(text).map(|caps| (pattern, caps)));

    match matching {
        InlineMatching::Priority => candidates.next(),
        // min_by_key keeps the first of equal keys, so ties follow PRIORITY.
        InlineMatching::Leftmost => candidates.min_by_key(|(_, caps)| caps.get_match().start()),
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
