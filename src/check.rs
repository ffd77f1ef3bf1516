//! `topicmark check`: report parse diagnostics for topic files.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use topic_markdown::{Diagnostic, ParserOptions, Severity};
use walkdir::WalkDir;

const TOPIC_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

/// Expand the given paths into topic files. Directories are walked recursively.
pub fn collect_files(paths: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let path = Path::new(path);
        if !path.is_dir() {
            files.push(path.to_path_buf());
            continue;
        }

        for entry in WalkDir::new(path).min_depth(1).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
            if entry.file_type().is_file() && is_topic_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }

    Ok(files)
}

fn is_topic_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TOPIC_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Check every file and print diagnostics. Returns `true` if any error was found.
pub fn handle_check(paths: &[String], parser: &ParserOptions, quiet: bool) -> Result<bool> {
    let files = collect_files(paths)?;
    log::info!("checking {} file(s)", files.len());

    let mut has_errors = false;

    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read '{}'", file.display()))?;

        let result = topic_markdown::parse_with(&content, parser);

        if result.diagnostics.is_empty() {
            if !quiet {
                println!("{}: {}", file.display(), "OK".green());
            }
            continue;
        }

        for diag in &result.diagnostics {
            if diag.severity == Severity::Error {
                has_errors = true;
            }
            println!("{}", format_diagnostic(&file.display().to_string(), diag));
        }
    }

    Ok(has_errors)
}

fn format_diagnostic(file: &str, diag: &Diagnostic) -> String {
    let severity_str = match diag.severity {
        Severity::Error => format!("{}", "error".red().bold()),
        Severity::Warning => format!("{}", "warning".yellow().bold()),
        Severity::Info => format!("{}", "info".cyan().bold()),
    };
    format!(
        "{}:{}: {}: [{}] {}",
        file, diag.line, severity_str, diag.code, diag.message
    )
}
