//! ANSI terminal renderer.
//!
//! Produces colored terminal output using the `colored` crate.

use colored::Colorize;

use crate::blocks::{QuoteLine, classify_quote_line};
use crate::inline::resolve_inline_with;
use crate::types::{Block, Document, Inline, RenderOptions};
use crate::video::{Presented, present};

/// Render a `Document` as ANSI-colored terminal text with default options.
pub fn to_terminal(doc: &Document) -> String {
    to_terminal_with(doc, &RenderOptions::default())
}

/// Render a `Document` as ANSI-colored terminal text.
pub fn to_terminal_with(doc: &Document, options: &RenderOptions) -> String {
    doc.blocks
        .iter()
        .map(|block| render_block(block, options))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_block(block: &Block, options: &RenderOptions) -> String {
    match block {
        Block::Heading { level, text } => {
            let marker = "#".repeat(usize::from(*level));
            format!("{} {}", marker.cyan().bold(), render_inline(text, options).bold())
        }

        Block::Paragraph { text } => render_inline(text, options),

        Block::List { ordered, items } => items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let bullet = if *ordered {
                    format!("{}.", i + 1)
                } else {
                    "\u{2022}".to_string() // •
                };
                format!("  {} {}", bullet.dimmed(), render_inline(item, options))
            })
            .collect::<Vec<_>>()
            .join("\n"),

        Block::BlockQuote { depth, lines } => {
            let border = format!("{} ", "\u{2502}".repeat(*depth).dimmed()); // │
            lines
                .iter()
                .map(|line| match classify_quote_line(line) {
                    QuoteLine::Blank => border.trim_end().to_string(),
                    QuoteLine::Heading { text, .. } => {
                        format!("{border}{}", render_inline(text, options).bold())
                    }
                    QuoteLine::ListItem { text, .. } => {
                        format!("{border}\u{2022} {}", render_inline(text, options))
                    }
                    QuoteLine::Text(text) => {
                        format!("{border}{}", render_inline(text, options).italic())
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        }

        Block::CodeBlock { text } => {
            let border = format!("{}", "\u{2500}\u{2500}\u{2500}".dimmed()); // ───
            let mut lines = vec![border.clone()];
            for line in text.lines() {
                lines.push(format!("  {line}"));
            }
            lines.push(border);
            lines.join("\n")
        }

        Block::Table { rows } => render_table(rows),

        Block::Image { alt_text, url } => {
            let desc = if alt_text.is_empty() { "Image" } else { alt_text };
            format!("{}", format!("[Image: {desc}] ({url})").dimmed())
        }

        Block::HorizontalRule => format!("{}", "\u{2500}".repeat(40).dimmed()),
    }
}

fn render_table(rows: &[Vec<String>]) -> String {
    let Some((header, body)) = rows.split_first() else {
        return String::new();
    };

    // Column widths across all rows; ragged rows widen the table.
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |row: &[String]| {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                format!(" {cell:w$} ")
            })
            .collect();
        format!("\u{2502}{}\u{2502}", cells.join("\u{2502}"))
    };

    let separator: String = widths
        .iter()
        .map(|&w| "\u{2500}".repeat(w + 2)) // ─
        .collect::<Vec<_>>()
        .join("\u{253C}"); // ┼

    let mut lines = vec![
        format!("{}", format_row(header.as_slice()).bold()),
        format!("\u{2502}{separator}\u{2502}"),
    ];
    for row in body {
        lines.push(format_row(row.as_slice()));
    }
    lines.join("\n")
}

fn render_inline(text: &str, options: &RenderOptions) -> String {
    let spans = resolve_inline_with(text, options.inline_matching);
    present(&spans, options.embed_videos)
        .into_iter()
        .map(|presented| match presented {
            Presented::VideoEmbed { embed_url } => {
                format!("{} {}", "\u{25B6}".red(), embed_url.underline()) // ▶
            }
            Presented::Span(span) => render_span(span),
        })
        .collect()
}

fn render_span(span: &Inline) -> String {
    match span {
        Inline::Text { content } => content.clone(),
        Inline::Bold { content } => format!("{}", content.bold()),
        Inline::Italic { content } => format!("{}", content.italic()),
        Inline::Strike { content } => format!("{}", content.strikethrough()),
        Inline::Code { content } => format!("{}", content.yellow()),
        Inline::Link { content, url } => {
            format!("{} {}", content.blue().underline(), format!("({url})").dimmed())
        }
    }
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
