use crate::blocks::BlockScanner;
use crate::error::Diagnostic;
use crate::types::{Block, Document, ParserOptions};

/// Result of parsing a topic document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// The parsed document.
    pub doc: Document,
    /// Non-fatal diagnostics collected during parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse topic text with default options.
///
/// This function never panics and never fails. Every line is absorbed into
/// some block, except for the content of a code fence that is never closed.
pub fn parse(input: &str) -> ParseResult {
    parse_with(input, &ParserOptions::default())
}

/// Parse topic text with explicit parser options.
pub fn parse_with(input: &str, options: &ParserOptions) -> ParseResult {
    // Normalise CRLF → LF.
    let source = input.replace("\r\n", "\n");

    let mut scanner = BlockScanner::new(options);
    for (idx, line) in source.split('\n').enumerate() {
        scanner.push_line(line, idx + 1);
    }
    let (blocks, issues) = scanner.finish();

    ParseResult {
        doc: Document { blocks, source },
        diagnostics: issues.into_iter().map(Diagnostic::from).collect(),
    }
}

/// Parse content that may be absent. Missing content is an empty document.
pub fn parse_optional(input: Option<&str>) -> ParseResult {
    match input {
        Some(text) => parse(text),
        None => ParseResult::default(),
    }
}

/// Parse topic text into blocks only, discarding diagnostics.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    parse(text).doc.blocks
}
