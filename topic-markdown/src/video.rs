//! Presentation mapping for video links.
//!
//! The inline resolver only ever produces `Inline::Link`. Renderers run the
//! resolved spans through [`present`] to swap links to recognised video hosts
//! for an embedded player.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::Inline;

static VIDEO_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([A-Za-z0-9_-]+)").unwrap()
});

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Derive the embeddable player URL for a recognised video link.
pub fn embed_url(url: &str) -> Option<String> {
    let caps = VIDEO_ID_RE.captures(url)?;
    Some(format!("{EMBED_BASE}{}", &caps[1]))
}

/// A span as it should be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presented<'a> {
    Span(&'a Inline),
    VideoEmbed { embed_url: String },
}

/// Map resolved spans to presentation variants.
///
/// With `embed_videos` off every span passes through unchanged.
pub fn present(spans: &[Inline], embed_videos: bool) -> Vec<Presented<'_>> {
    spans
        .iter()
        .map(|span| match span {
            Inline::Link { url, .. } if embed_videos => match embed_url(url) {
                Some(embed_url) => Presented::VideoEmbed { embed_url },
                None => Presented::Span(span),
            },
            other => Presented::Span(other),
        })
        .collect()
}
