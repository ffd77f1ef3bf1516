use serde::{Deserialize, Serialize};

/// Conditions the parser notices while absorbing a document.
///
/// None of these stop parsing; each is turned into a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIssue {
    #[error("Code fence opened at line {line} is never closed; its content was discarded")]
    UnterminatedFence { line: usize },

    #[error("Table separator row at line {line} is kept as a data row")]
    TableSeparatorRow { line: usize },

    #[error("Table row at line {line} has {found} cells but the header has {expected}")]
    RaggedTableRow {
        line: usize,
        expected: usize,
        found: usize,
    },
}

impl ParseIssue {
    pub fn line(&self) -> usize {
        match self {
            ParseIssue::UnterminatedFence { line }
            | ParseIssue::TableSeparatorRow { line }
            | ParseIssue::RaggedTableRow { line, .. } => *line,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ParseIssue::UnterminatedFence { .. } => "P001",
            ParseIssue::TableSeparatorRow { .. } => "P002",
            ParseIssue::RaggedTableRow { .. } => "P003",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ParseIssue::UnterminatedFence { .. } => Severity::Error,
            ParseIssue::TableSeparatorRow { .. } => Severity::Info,
            ParseIssue::RaggedTableRow { .. } => Severity::Warning,
        }
    }
}

/// A diagnostic message produced during parsing.
///
/// Diagnostics are non-fatal: the parser always produces a complete document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// 1-based source line the diagnostic refers to.
    pub line: usize,
    pub code: String,
}

impl From<ParseIssue> for Diagnostic {
    fn from(issue: ParseIssue) -> Self {
        Diagnostic {
            severity: issue.severity(),
            message: issue.to_string(),
            line: issue.line(),
            code: issue.code().to_string(),
        }
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}
