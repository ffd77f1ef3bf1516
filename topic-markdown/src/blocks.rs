//! Line scanner for block structure.
//!
//! `BlockScanner` consumes one source line at a time and keeps at most one
//! accumulation context open (paragraph, list, quote, table or code fence).
//! Opening a context always flushes the previous one, so blocks come out in
//! source line order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ParseIssue;
use crate::types::{Block, ParserOptions};

const FENCE: &str = "```";

static IMAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());
static UNORDERED_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[*\-+]\s+").unwrap());
static ORDERED_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.\s+").unwrap());

/// The accumulation context that is currently open.
#[derive(Debug, Default)]
enum Open {
    #[default]
    None,
    Paragraph(String),
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Quote {
        depth: usize,
        lines: Vec<String>,
    },
    Table {
        rows: Vec<Vec<String>>,
    },
    Fence {
        text: String,
        opened_at: usize, // 1-based line of the opening fence
    },
}

/// Forward-only block scanner.
pub(crate) struct BlockScanner<'o> {
    options: &'o ParserOptions,
    open: Open,
    blocks: Vec<Block>,
    issues: Vec<ParseIssue>,
}

impl<'o> BlockScanner<'o> {
    pub(crate) fn new(options: &'o ParserOptions) -> Self {
        Self {
            options,
            open: Open::None,
            blocks: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Absorb one line. `line_no` is 1-based and only used for diagnostics.
    pub(crate) fn push_line(&mut self, line: &str, line_no: usize) {
        if line.trim() == FENCE {
            self.toggle_fence(line_no);
            return;
        }

        if let Open::Fence { text, .. } = &mut self.open {
            text.push_str(line);
            text.push('\n');
            return;
        }

        // Image syntax anywhere on the line wins over every other line shape.
        if let Some(caps) = IMAGE_RE.captures(line) {
            self.emit(Block::Image {
                alt_text: caps[1].to_string(),
                url: caps[2].to_string(),
            });
            return;
        }

        if line.starts_with('|') {
            self.push_table_row(line, line_no);
            return;
        }

        if let Some((level, text)) = heading(line, 6) {
            self.emit(Block::Heading {
                level,
                text: text.to_string(),
            });
            return;
        }

        if line.starts_with('>') {
            self.push_quote_line(line);
            return;
        }

        if let Some((ordered, item)) = list_item(line) {
            self.push_list_item(ordered, item);
            return;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            self.flush();
            return;
        }

        if trimmed == "---" {
            self.emit(Block::HorizontalRule);
            return;
        }

        self.push_paragraph_line(line);
    }

    /// Flush whatever is still open and hand back the blocks and issues.
    pub(crate) fn finish(mut self) -> (Vec<Block>, Vec<ParseIssue>) {
        self.flush();
        (self.blocks, self.issues)
    }

    fn toggle_fence(&mut self, line_no: usize) {
        if matches!(self.open, Open::Fence { .. }) {
            if let Open::Fence { text, .. } = std::mem::take(&mut self.open) {
                self.blocks.push(Block::CodeBlock { text });
            }
            return;
        }
        self.flush();
        self.open = Open::Fence {
            text: String::new(),
            opened_at: line_no,
        };
    }

    fn push_table_row(&mut self, line: &str, line_no: usize) {
        let cells = split_table_row(line);

        if let Open::Table { rows } = &mut self.open {
            if rows.len() == 1 && is_separator_row(&cells) {
                if self.options.drop_table_separator {
                    log::debug!("dropping table separator row at line {line_no}");
                    return;
                }
                self.issues
                    .push(ParseIssue::TableSeparatorRow { line: line_no });
            }
            if let Some(header) = rows.first() {
                if header.len() != cells.len() {
                    self.issues.push(ParseIssue::RaggedTableRow {
                        line: line_no,
                        expected: header.len(),
                        found: cells.len(),
                    });
                }
            }
            rows.push(cells);
            return;
        }

        self.flush();
        self.open = Open::Table { rows: vec![cells] };
    }

    fn push_quote_line(&mut self, line: &str) {
        let depth = line.bytes().take_while(|&b| b == b'>').count();
        let rest = &line[depth..];
        let text = rest.strip_prefix(' ').unwrap_or(rest).to_string();

        if let Open::Quote {
            depth: open_depth,
            lines,
        } = &mut self.open
        {
            if *open_depth == depth {
                lines.push(text);
                return;
            }
        }

        self.flush();
        self.open = Open::Quote {
            depth,
            lines: vec![text],
        };
    }

    fn push_list_item(&mut self, ordered: bool, item: &str) {
        if let Open::List {
            ordered: open_ordered,
            items,
        } = &mut self.open
        {
            if *open_ordered == ordered {
                items.push(item.to_string());
                return;
            }
        }

        self.flush();
        self.open = Open::List {
            ordered,
            items: vec![item.to_string()],
        };
    }

    fn push_paragraph_line(&mut self, line: &str) {
        if let Open::Paragraph(text) = &mut self.open {
            text.push(' ');
            text.push_str(line);
            return;
        }

        self.flush();
        self.open = Open::Paragraph(line.to_string());
    }

    /// Flush the open context, then push a standalone block.
    fn emit(&mut self, block: Block) {
        self.flush();
        self.blocks.push(block);
    }

    fn flush(&mut self) {
        match std::mem::take(&mut self.open) {
            Open::None => {}
            Open::Paragraph(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    self.blocks.push(Block::Paragraph {
                        text: text.to_string(),
                    });
                }
            }
            Open::List { ordered, items } => {
                if !items.is_empty() {
                    self.blocks.push(Block::List { ordered, items });
                }
            }
            Open::Quote { depth, lines } => {
                if !lines.is_empty() {
                    self.blocks.push(Block::BlockQuote { depth, lines });
                }
            }
            Open::Table { rows } => {
                if !rows.is_empty() {
                    self.blocks.push(Block::Table { rows });
                }
            }
            Open::Fence { text, opened_at } => {
                log::debug!(
                    "discarding {} bytes of unterminated fence opened at line {opened_at}",
                    text.len()
                );
                self.issues
                    .push(ParseIssue::UnterminatedFence { line: opened_at });
            }
        }
    }
}

/// Match `#`..`#`×`max_level` followed by a space, longest prefix first.
fn heading(line: &str, max_level: u8) -> Option<(u8, &str)> {
    (1..=max_level).rev().find_map(|level| {
        let hashes = &"######"[..usize::from(level)];
        line.strip_prefix(hashes)?
            .strip_prefix(' ')
            .map(|text| (level, text))
    })
}

/// Returns `(ordered, item_text)` when the line opens a list item.
fn list_item(line: &str) -> Option<(bool, &str)> {
    if let Some(m) = UNORDERED_ITEM_RE.find(line) {
        return Some((false, &line[m.end()..]));
    }
    ORDERED_ITEM_RE.find(line).map(|m| (true, &line[m.end()..]))
}

/// Split a `|`-prefixed line into trimmed cells.
///
/// The first and last segments are always discarded, whether or not the line
/// ends with a pipe.
fn split_table_row(line: &str) -> Vec<String> {
    let segments: Vec<&str> = line.split('|').collect();
    if segments.len() <= 2 {
        return Vec::new();
    }
    segments[1..segments.len() - 1]
        .iter()
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Whether the cells look like a `|---|:--:|` separator row.
fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
        })
}

/// Shape of a single line inside a block quote, for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteLine<'a> {
    /// Whitespace-only line; presented as a line break.
    Blank,
    /// `#`..`####` heading.
    Heading { level: u8, text: &'a str },
    /// A single list item.
    ListItem { ordered: bool, text: &'a str },
    Text(&'a str),
}

/// Classify a block-quote line for presentation.
///
/// Only heading levels 1 to 4 are recognised inside quotes.
pub fn classify_quote_line(line: &str) -> QuoteLine<'_> {
    if line.trim().is_empty() {
        return QuoteLine::Blank;
    }
    if let Some((level, text)) = heading(line, 4) {
        return QuoteLine::Heading { level, text };
    }
    if let Some((ordered, text)) = list_item(line) {
        return QuoteLine::ListItem { ordered, text };
    }
    QuoteLine::Text(line)
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(input: &str) -> (Vec<Block>, Vec<ParseIssue>) {
        scan_with(input, &ParserOptions::default())
    }

    fn scan_with(input: &str, options: &ParserOptions) -> (Vec<Block>, Vec<ParseIssue>) {
        let mut scanner = BlockScanner::new(options);
        for (idx, line) in input.split('\n').enumerate() {
            scanner.push_line(line, idx + 1);
        }
        scanner.finish()
    }

    fn blocks(input: &str) -> Vec<Block> {
        scan(input).0
    }

    fn para(text: &str) -> Block {
        Block::Paragraph { text: text.into() }
    }

    fn list(ordered: bool, items: &[&str]) -> Block {
        Block::List {
            ordered,
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn quote(depth: usize, lines: &[&str]) -> Block {
        Block::BlockQuote {
            depth,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    // -- Headings --------------------------------------------------

    #[test]
    fn heading_then_paragraph() {
        assert_eq!(
            blocks("# Title\n\nBody text"),
            vec![
                Block::Heading {
                    level: 1,
                    text: "Title".into()
                },
                para("Body text"),
            ]
        );
    }

    #[test]
    fn six_hashes_is_level_six() {
        assert_eq!(
            blocks("###### Deep"),
            vec![Block::Heading {
                level: 6,
                text: "Deep".into()
            }]
        );
    }

    #[test]
    fn seven_hashes_is_a_paragraph() {
        assert_eq!(blocks("####### Too deep"), vec![para("####### Too deep")]);
    }

    #[test]
    fn hash_without_space_is_a_paragraph() {
        assert_eq!(blocks("#hashtag"), vec![para("#hashtag")]);
    }

    #[test]
    fn heading_flushes_open_paragraph_first() {
        assert_eq!(
            blocks("intro line\n## Section"),
            vec![
                para("intro line"),
                Block::Heading {
                    level: 2,
                    text: "Section".into()
                },
            ]
        );
    }

    // -- Paragraphs ------------------------------------------------

    #[test]
    fn soft_breaks_collapse_to_spaces() {
        assert_eq!(
            blocks("first line\nsecond line\n  third  "),
            vec![para("first line second line   third")]
        );
    }

    #[test]
    fn whitespace_only_line_separates_paragraphs() {
        assert_eq!(blocks("one\n   \ntwo"), vec![para("one"), para("two")]);
    }

    // -- Lists -----------------------------------------------------

    #[test]
    fn lists_split_on_blank_line_and_kind() {
        assert_eq!(
            blocks("- a\n- b\n\n1. x\n2. y"),
            vec![list(false, &["a", "b"]), list(true, &["x", "y"])]
        );
    }

    #[test]
    fn kind_switch_without_blank_starts_new_list() {
        assert_eq!(
            blocks("* a\n+ b\n1. c"),
            vec![list(false, &["a", "b"]), list(true, &["c"])]
        );
    }

    #[test]
    fn paragraph_line_ends_list() {
        assert_eq!(
            blocks("- a\nafter\n- b"),
            vec![list(false, &["a"]), para("after"), list(false, &["b"])]
        );
    }

    #[test]
    fn indented_marker_is_not_a_list_item() {
        assert_eq!(blocks("  - nested"), vec![para("- nested")]);
    }

    #[test]
    fn bold_line_is_not_a_list_item() {
        assert_eq!(blocks("**bold** start"), vec![para("**bold** start")]);
    }

    // -- Block quotes ----------------------------------------------

    #[test]
    fn quote_depth_change_splits() {
        assert_eq!(
            blocks("> level1\n>> level2"),
            vec![quote(1, &["level1"]), quote(2, &["level2"])]
        );
    }

    #[test]
    fn same_depth_lines_group() {
        assert_eq!(
            blocks("> one\n>two\n>\n> three"),
            vec![quote(1, &["one", "two", "", "three"])]
        );
    }

    #[test]
    fn quote_strips_only_one_space() {
        assert_eq!(blocks(">   indented"), vec![quote(1, &["  indented"])]);
    }

    #[test]
    fn quote_then_paragraph() {
        assert_eq!(
            blocks("> quoted\nplain"),
            vec![quote(1, &["quoted"]), para("plain")]
        );
    }

    // -- Code fences -----------------------------------------------

    #[test]
    fn fence_captures_verbatim() {
        assert_eq!(
            blocks("```\ncode line\n```"),
            vec![Block::CodeBlock {
                text: "code line\n".into()
            }]
        );
    }

    #[test]
    fn fence_content_is_not_reinterpreted() {
        assert_eq!(
            blocks("```\n# not a heading\n- not a list\n| not | table |\n```"),
            vec![Block::CodeBlock {
                text: "# not a heading\n- not a list\n| not | table |\n".into()
            }]
        );
    }

    #[test]
    fn indented_fence_line_still_toggles() {
        assert_eq!(
            blocks("  ```\nx\n```  "),
            vec![Block::CodeBlock { text: "x\n".into() }]
        );
    }

    #[test]
    fn fence_with_language_tag_is_not_a_fence() {
        assert_eq!(blocks("```rust"), vec![para("```rust")]);
    }

    #[test]
    fn fence_flushes_open_paragraph() {
        assert_eq!(
            blocks("before\n```\nx\n```\nafter"),
            vec![
                para("before"),
                Block::CodeBlock { text: "x\n".into() },
                para("after"),
            ]
        );
    }

    #[test]
    fn unterminated_fence_is_discarded() {
        let (blocks, issues) = scan("intro\n```\nlost\nalso lost");
        assert_eq!(blocks, vec![para("intro")]);
        assert_eq!(issues, vec![ParseIssue::UnterminatedFence { line: 2 }]);
    }

    // -- Images ----------------------------------------------------

    #[test]
    fn image_line_is_standalone() {
        assert_eq!(
            blocks("text\n![diagram](img/d.png)\nmore"),
            vec![
                para("text"),
                Block::Image {
                    alt_text: "diagram".into(),
                    url: "img/d.png".into()
                },
                para("more"),
            ]
        );
    }

    #[test]
    fn image_wins_over_list_and_table() {
        assert_eq!(
            blocks("- ![a](x.png)\n| ![b](y.png) |"),
            vec![
                Block::Image {
                    alt_text: "a".into(),
                    url: "x.png".into()
                },
                Block::Image {
                    alt_text: "b".into(),
                    url: "y.png".into()
                },
            ]
        );
    }

    #[test]
    fn image_with_empty_alt() {
        assert_eq!(
            blocks("![](pic.jpg)"),
            vec![Block::Image {
                alt_text: String::new(),
                url: "pic.jpg".into()
            }]
        );
    }

    // -- Tables ----------------------------------------------------

    #[test]
    fn table_keeps_separator_row_by_default() {
        let (blocks, issues) = scan("| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            blocks,
            vec![Block::Table {
                rows: vec![
                    vec!["a".to_string(), "b".to_string()],
                    vec!["---".to_string(), "---".to_string()],
                    vec!["1".to_string(), "2".to_string()],
                ]
            }]
        );
        assert_eq!(issues, vec![ParseIssue::TableSeparatorRow { line: 2 }]);
    }

    #[test]
    fn table_separator_dropped_when_configured() {
        let options = ParserOptions {
            drop_table_separator: true,
        };
        let (blocks, issues) = scan_with("| a | b |\n| :-- | --: |\n| 1 | 2 |", &options);
        assert_eq!(
            blocks,
            vec![Block::Table {
                rows: vec![
                    vec!["a".to_string(), "b".to_string()],
                    vec!["1".to_string(), "2".to_string()],
                ]
            }]
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn separator_like_row_later_in_table_is_data() {
        let options = ParserOptions {
            drop_table_separator: true,
        };
        let (blocks, _) = scan_with("| a |\n| 1 |\n|---|", &options);
        match &blocks[0] {
            Block::Table { rows } => assert_eq!(rows.len(), 3),
            other => panic!("Expected Table, got {other:?}"),
        }
    }

    #[test]
    fn table_without_trailing_pipe_drops_last_cell() {
        assert_eq!(
            blocks("| a | b"),
            vec![Block::Table {
                rows: vec![vec!["a".to_string()]]
            }]
        );
    }

    #[test]
    fn table_flushed_by_non_pipe_line() {
        assert_eq!(
            blocks("| a |\ntext"),
            vec![
                Block::Table {
                    rows: vec![vec!["a".to_string()]]
                },
                para("text"),
            ]
        );
    }

    #[test]
    fn ragged_row_is_reported() {
        let (_, issues) = scan("| a | b |\n| 1 |");
        assert_eq!(
            issues,
            vec![ParseIssue::RaggedTableRow {
                line: 2,
                expected: 2,
                found: 1
            }]
        );
    }

    #[test]
    fn short_separator_row_is_also_ragged() {
        let (_, issues) = scan("| a | b |\n|---|\n| 1 | 2 |");
        assert_eq!(
            issues,
            vec![
                ParseIssue::TableSeparatorRow { line: 2 },
                ParseIssue::RaggedTableRow {
                    line: 2,
                    expected: 2,
                    found: 1
                },
            ]
        );
    }

    #[test]
    fn dropped_separator_row_is_not_checked_for_width() {
        let options = ParserOptions {
            drop_table_separator: true,
        };
        let (_, issues) = scan_with("| a | b |\n|---|\n| 1 | 2 |", &options);
        assert_eq!(issues, vec![]);
    }

    // -- Rules and blank lines -------------------------------------

    #[test]
    fn rule_between_paragraphs() {
        assert_eq!(
            blocks("above\n ---  \nbelow"),
            vec![para("above"), Block::HorizontalRule, para("below")]
        );
    }

    #[test]
    fn blank_only_input_is_empty() {
        assert!(blocks("\n\n   \n").is_empty());
    }

    // -- Quote line classification ---------------------------------

    #[test]
    fn classify_quote_lines() {
        assert_eq!(classify_quote_line("  "), QuoteLine::Blank);
        assert_eq!(
            classify_quote_line("#### Four"),
            QuoteLine::Heading {
                level: 4,
                text: "Four"
            }
        );
        assert_eq!(
            classify_quote_line("##### Five"),
            QuoteLine::Text("##### Five")
        );
        assert_eq!(
            classify_quote_line("2. step"),
            QuoteLine::ListItem {
                ordered: true,
                text: "step"
            }
        );
        assert_eq!(
            classify_quote_line("- point"),
            QuoteLine::ListItem {
                ordered: false,
                text: "point"
            }
        );
    }
}
