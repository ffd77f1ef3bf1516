//! WASM bindings for `topic-markdown`.
//!
//! Exposes the topic parser to the browser display component via
//! wasm-bindgen. Call `parse()` to get the block sequence as JSON, then
//! `resolve_inline()` on each block's text, or use `render_html()` for a
//! ready-made fragment.

use topic_markdown::{InlineMatching, RenderOptions};
use wasm_bindgen::prelude::*;

/// Parse topic content and return the document as a JSON AST.
///
/// Returns a JSON object with `{ doc, diagnostics }`. Absent content
/// (`null`/`undefined`) yields an empty document.
#[wasm_bindgen]
pub fn parse(input: Option<String>) -> String {
    let result = topic_markdown::parse_optional(input.as_deref());
    serde_json::json!({
        "doc": result.doc,
        "diagnostics": result.diagnostics,
    })
    .to_string()
}

/// Parse topic content and return the block array as a JS value.
#[wasm_bindgen]
pub fn parse_blocks(input: Option<String>) -> Result<JsValue, JsValue> {
    let result = topic_markdown::parse_optional(input.as_deref());
    serde_wasm_bindgen::to_value(&result.doc.blocks).map_err(JsValue::from)
}

/// Resolve one line of block text into inline spans, returned as JSON.
///
/// `leftmost` switches from priority matching to earliest-match-wins.
#[wasm_bindgen]
pub fn resolve_inline(line: &str, leftmost: Option<bool>) -> String {
    let matching = if leftmost.unwrap_or(false) {
        InlineMatching::Leftmost
    } else {
        InlineMatching::Priority
    };
    let spans = topic_markdown::resolve_inline_with(line, matching);
    serde_json::to_string(&spans).unwrap_or_else(|_| "[]".to_string())
}

/// Parse topic content and return an HTML fragment.
///
/// The output uses `topic-*` CSS classes.
#[wasm_bindgen]
pub fn render_html(input: Option<String>, embed_videos: Option<bool>) -> String {
    let result = topic_markdown::parse_optional(input.as_deref());
    let options = RenderOptions {
        embed_videos: embed_videos.unwrap_or(true),
        ..Default::default()
    };
    result.doc.to_html(&options)
}

/// Return the embeddable player URL for a recognised video link.
#[wasm_bindgen]
pub fn embed_url(url: &str) -> Option<String> {
    topic_markdown::embed_url(url)
}
