//! `topic-markdown`: parser for learning-topic content.
//!
//! Topic descriptions are written in a small markdown dialect. This crate turns
//! that text into an ordered sequence of typed blocks, resolves inline spans
//! within block text on demand, and renders the result as HTML or terminal
//! text.
//!
//! # Quick start
//!
//! ```
//! use topic_markdown::{Block, Inline};
//!
//! let result = topic_markdown::parse("# Hello\n\nSome **bold** text.");
//! assert!(result.diagnostics.is_empty());
//! assert_eq!(result.doc.blocks.len(), 2);
//!
//! let Block::Paragraph { text } = &result.doc.blocks[1] else { unreachable!() };
//! let spans = topic_markdown::resolve_inline(text);
//! assert_eq!(spans[1], Inline::Bold { content: "bold".into() });
//! ```

pub mod blocks;
pub mod error;
pub mod inline;
pub mod parse;
pub mod render_html;
#[cfg(feature = "terminal")]
pub mod render_term;
pub mod types;
pub mod video;

pub use blocks::{QuoteLine, classify_quote_line};
pub use error::*;
pub use inline::{resolve_inline, resolve_inline_with};
pub use parse::{ParseResult, parse, parse_blocks, parse_optional, parse_with};
pub use render_html::PageConfig;
pub use types::*;
pub use video::{Presented, embed_url, present};

impl Document {
    /// Render this document as an HTML fragment with `topic-*` CSS classes.
    pub fn to_html(&self, options: &RenderOptions) -> String {
        render_html::to_html_with(self, options)
    }

    /// Render this document as a complete standalone HTML page.
    pub fn to_html_page(&self, config: &PageConfig, options: &RenderOptions) -> String {
        render_html::to_html_page(self, config, options)
    }

    /// Render this document as ANSI-colored terminal text.
    #[cfg(feature = "terminal")]
    pub fn to_terminal(&self, options: &RenderOptions) -> String {
        render_term::to_terminal_with(self, options)
    }
}
