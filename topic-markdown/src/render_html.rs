//! HTML fragment renderer.
//!
//! Produces semantic HTML with `topic-*` CSS classes. Inline spans are
//! resolved per block text; all text content is HTML-escaped.

use crate::blocks::{QuoteLine, classify_quote_line};
use crate::inline::resolve_inline_with;
use crate::types::{Block, Document, Inline, RenderOptions};
use crate::video::{Presented, present};

/// Configuration for full-page HTML rendering.
#[derive(Debug, Clone, Default)]
pub struct PageConfig {
    /// Page title. Falls back to the first heading, then "Topic".
    pub title: Option<String>,
    /// Optional language code (default: "en").
    pub lang: Option<String>,
}

/// Render a `Document` as an HTML fragment with default options.
pub fn to_html(doc: &Document) -> String {
    to_html_with(doc, &RenderOptions::default())
}

/// Render a `Document` as an HTML fragment.
///
/// No `<html>`, `<head>`, or `<body>` wrapper is added.
pub fn to_html_with(doc: &Document, options: &RenderOptions) -> String {
    doc.blocks
        .iter()
        .map(|block| render_block(block, options))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a `Document` as a complete standalone HTML page.
pub fn to_html_page(doc: &Document, config: &PageConfig, options: &RenderOptions) -> String {
    let body = to_html_with(doc, options);
    let lang = config.lang.as_deref().unwrap_or("en");

    // Resolve title: explicit config > first heading > fallback
    let title = config
        .title
        .clone()
        .or_else(|| {
            doc.blocks.iter().find_map(|block| match block {
                Block::Heading { text, .. } => Some(text.clone()),
                _ => None,
            })
        })
        .unwrap_or_else(|| "Topic".to_string());

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
<article class="topic">
{body}
</article>
</body>
</html>"#,
        lang = escape_html(lang),
        title = escape_html(&title),
        css = TOPIC_CSS,
        body = body,
    )
}

/// Embedded CSS for standalone topic pages.
const TOPIC_CSS: &str = r#"
.topic { display: flex; flex-direction: column; gap: 16px; max-width: 860px; margin: 2rem auto; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; line-height: 1.7; }
.topic h1, .topic h2, .topic h3, .topic h4 { font-weight: 600; margin: 8px 0; }
.topic h5, .topic h6 { font-weight: 500; margin: 0; line-height: 1.5; }
.topic-quote { border-left: 4px solid #d0d7de; padding-left: 12px; margin: 12px 0; color: #57606a; background: #f6f8fa; font-style: italic; }
.topic-code { background: #f6f8fa; padding: 12px; border-radius: 6px; border: 1px solid #d0d7de; font-family: monospace; overflow-x: auto; }
.topic code { background: #f6f8fa; padding: 2px 6px; border-radius: 4px; font-family: monospace; color: #d63384; }
.topic-code code { background: none; padding: 0; color: #24292f; }
.topic del { color: #b91c1c; }
.topic a { text-decoration: none; }
.topic a:hover { text-decoration: underline; }
.topic-image { width: 300px; height: 200px; object-fit: cover; border-radius: 8px; }
.topic-table { border-collapse: collapse; width: 100%; margin: 12px 0; }
.topic-table th, .topic-table td { border: 1px solid #d0d7de; padding: 8px; text-align: left; }
.topic-table th { background: #f6f8fa; font-weight: 600; }
.topic-video { display: block; margin: 12px 0; }
.topic-video iframe { max-width: 100%; border: 0; }
.topic hr { border: none; border-top: 2px solid #ccc; margin: 1rem 0; }
"#;

/// Escape HTML special characters to prevent XSS.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_block(block: &Block, options: &RenderOptions) -> String {
    match block {
        Block::Heading { level, text } => {
            format!("<h{level}>{}</h{level}>", render_inline(text, options))
        }

        Block::Paragraph { text } => format!("<p>{}</p>", render_inline(text, options)),

        Block::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let mut html = format!("<{tag} class=\"topic-list\">");
            for item in items {
                html.push_str(&format!("<li>{}</li>", render_inline(item, options)));
            }
            html.push_str(&format!("</{tag}>"));
            html
        }

        Block::BlockQuote { depth, lines } => {
            let indent = depth.saturating_sub(1) * 16;
            let mut html = format!(
                "<blockquote class=\"topic-quote\" data-depth=\"{depth}\" style=\"margin-left: {indent}px\">"
            );
            for line in lines {
                html.push_str(&render_quote_line(line, options));
            }
            html.push_str("</blockquote>");
            html
        }

        Block::CodeBlock { text } => format!(
            "<pre class=\"topic-code\"><code>{}</code></pre>",
            escape_html(text)
        ),

        Block::Table { rows } => {
            let Some((header, body)) = rows.split_first() else {
                return String::new();
            };
            let mut html = String::from("<table class=\"topic-table\"><thead><tr>");
            for cell in header {
                html.push_str(&format!("<th scope=\"col\">{}</th>", escape_html(cell)));
            }
            html.push_str("</tr></thead><tbody>");
            for row in body {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str(&format!("<td>{}</td>", escape_html(cell)));
                }
                html.push_str("</tr>");
            }
            html.push_str("</tbody></table>");
            html
        }

        Block::Image { alt_text, url } => format!(
            "<img class=\"topic-image\" src=\"{}\" alt=\"{}\">",
            escape_html(url),
            escape_html(alt_text)
        ),

        Block::HorizontalRule => "<hr>".to_string(),
    }
}

fn render_quote_line(line: &str, options: &RenderOptions) -> String {
    match classify_quote_line(line) {
        QuoteLine::Blank => "<br>".to_string(),
        QuoteLine::Heading { level, text } => {
            format!("<h{level}>{}</h{level}>", render_inline(text, options))
        }
        QuoteLine::ListItem { ordered, text } => {
            let tag = if ordered { "ol" } else { "ul" };
            format!("<{tag}><li>{}</li></{tag}>", render_inline(text, options))
        }
        QuoteLine::Text(text) => format!("<p>{}</p>", render_inline(text, options)),
    }
}

/// Resolve and render the inline spans of one line of block text.
fn render_inline(text: &str, options: &RenderOptions) -> String {
    let spans = resolve_inline_with(text, options.inline_matching);
    present(&spans, options.embed_videos)
        .into_iter()
        .map(|presented| match presented {
            Presented::VideoEmbed { embed_url } => format!(
                "<span class=\"topic-video\"><iframe width=\"560\" height=\"315\" src=\"{}\" title=\"YouTube video player\" allow=\"accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture\" allowfullscreen></iframe></span>",
                escape_html(&embed_url)
            ),
            Presented::Span(span) => render_span(span),
        })
        .collect()
}

fn render_span(span: &Inline) -> String {
    match span {
        Inline::Text { content } => escape_html(content),
        Inline::Bold { content } => format!("<strong>{}</strong>", escape_html(content)),
        Inline::Italic { content } => format!("<em>{}</em>", escape_html(content)),
        Inline::Strike { content } => format!("<del>{}</del>", escape_html(content)),
        Inline::Code { content } => format!("<code>{}</code>", escape_html(content)),
        Inline::Link { content, url } => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            escape_html(url),
            escape_html(content)
        ),
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
