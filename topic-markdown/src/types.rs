use serde::{Deserialize, Serialize};

/// A parsed topic document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Ordered sequence of blocks, in source line order.
    pub blocks: Vec<Block>,
    /// Source text after line-ending normalisation.
    pub source: String,
}

/// A top-level block of a topic document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Block {
    /// `#` through `######` heading.
    Heading { level: u8, text: String },
    /// Consecutive text lines joined with single spaces.
    Paragraph { text: String },
    /// Contiguous items of a single list kind.
    List { ordered: bool, items: Vec<String> },
    /// Contiguous `>` lines sharing the same depth.
    BlockQuote { depth: usize, lines: Vec<String> },
    /// Verbatim fenced content. Each captured line keeps its trailing newline.
    CodeBlock { text: String },
    /// Pipe table. Row 0 is the header row.
    Table { rows: Vec<Vec<String>> },
    /// Standalone `![alt](url)` line.
    Image { alt_text: String, url: String },
    HorizontalRule,
}

impl Block {
    /// Raw text fields of this block that are subject to inline resolution.
    ///
    /// Code blocks, tables, images and rules carry no inline-resolved text.
    pub fn inline_sources(&self) -> Vec<&str> {
        match self {
            Block::Heading { text, .. } | Block::Paragraph { text } => vec![text.as_str()],
            Block::List { items, .. } => items.iter().map(String::as_str).collect(),
            Block::BlockQuote { lines, .. } => lines.iter().map(String::as_str).collect(),
            Block::CodeBlock { .. }
            | Block::Table { .. }
            | Block::Image { .. }
            | Block::HorizontalRule => Vec::new(),
        }
    }

    /// Short lowercase name of the block variant, as used in diagnostics and CSS classes.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::List { .. } => "list",
            Block::BlockQuote { .. } => "blockquote",
            Block::CodeBlock { .. } => "code",
            Block::Table { .. } => "table",
            Block::Image { .. } => "image",
            Block::HorizontalRule => "rule",
        }
    }
}

/// A typed fragment of a single line of block text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Inline {
    Text { content: String },
    Bold { content: String },
    Italic { content: String },
    Strike { content: String },
    Code { content: String },
    Link { content: String, url: String },
}

impl Inline {
    /// Display text of the span. For links this is the link label.
    pub fn content(&self) -> &str {
        match self {
            Inline::Text { content }
            | Inline::Bold { content }
            | Inline::Italic { content }
            | Inline::Strike { content }
            | Inline::Code { content }
            | Inline::Link { content, .. } => content,
        }
    }
}

/// How the inline resolver chooses between competing patterns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineMatching {
    /// Try bold, italic, strike, code, link in that order and take the first
    /// pattern that occurs anywhere in the remaining text.
    #[default]
    Priority,
    /// Take whichever pattern starts earliest; ties go to the priority order.
    Leftmost,
}

/// Options for the block parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserOptions {
    /// Drop a `|---|---|` row when it is the second row of a table.
    pub drop_table_separator: bool,
}

/// Options shared by the HTML and terminal renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    pub inline_matching: InlineMatching,
    /// Replace recognised video links with an embedded player.
    pub embed_videos: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            inline_matching: InlineMatching::Priority,
            embed_videos: true,
        }
    }
}
