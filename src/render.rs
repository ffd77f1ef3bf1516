//! `topicmark render`: render a topic file once, or re-render on every save.

use anyhow::Result;
use colored::Colorize;
use notify::{EventKind, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use topic_markdown::{PageConfig, ParseResult, ParserOptions, RenderOptions};

use crate::config::RenderFormat;

/// Everything `render` needs besides the file path.
pub struct RenderOpts {
    pub format: RenderFormat,
    pub parser: ParserOptions,
    pub render: RenderOptions,
    pub page_title: Option<String>,
    pub quiet: bool,
}

/// Produce the output for an already parsed document in the requested format.
pub fn render_result(result: &ParseResult, opts: &RenderOpts) -> Result<String> {
    let output = match opts.format {
        RenderFormat::Terminal => result.doc.to_terminal(&opts.render),
        RenderFormat::Html => result.doc.to_html(&opts.render),
        RenderFormat::Page => {
            let config = PageConfig {
                title: opts.page_title.clone(),
                ..Default::default()
            };
            result.doc.to_html_page(&config, &opts.render)
        }
        RenderFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
            "blocks": result.doc.blocks,
            "diagnostics": result.diagnostics,
        }))?,
    };
    Ok(output)
}

pub fn handle_render(file: &str, opts: &RenderOpts) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", file, e))?;

    let result = topic_markdown::parse_with(&content, &opts.parser);

    // JSON output already carries the diagnostics
    if !opts.quiet && opts.format != RenderFormat::Json {
        for diag in &result.diagnostics {
            eprintln!("{}:{}: {}", file, diag.line, diag.message);
        }
    }

    println!("{}", render_result(&result, opts)?);
    Ok(())
}

/// Compute SHA-256 hash of file contents.
fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Watch the source file for changes and re-render on each save.
///
/// Debounces rapid events (e.g. editors that write in stages) with a 200ms
/// window and skips saves that leave the content unchanged. Ctrl+C exits.
pub fn watch_and_render(file: &str, opts: &RenderOpts) -> Result<()> {
    let file_path = std::fs::canonicalize(file)
        .map_err(|e| anyhow::anyhow!("Cannot resolve path '{}': {}", file, e))?;

    let watch_dir = file_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine parent directory of '{}'", file))?;

    handle_render(file, opts)?;
    let mut last_hash = read_hash(&file_path);

    if !opts.quiet {
        eprintln!(
            "{} {} for changes (Ctrl+C to stop)",
            "Watching".cyan().bold(),
            file
        );
    }

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(watch_dir, RecursiveMode::NonRecursive)?;

    let mut last_render = Instant::now();
    let debounce = Duration::from_millis(200);

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => {
                let is_write = matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_));
                let affects_our_file = event
                    .paths
                    .iter()
                    .any(|p| p.canonicalize().ok().as_ref() == Some(&file_path));

                if !(is_write && affects_our_file) || last_render.elapsed() <= debounce {
                    continue;
                }

                // Small delay to let the editor finish writing
                std::thread::sleep(Duration::from_millis(50));

                let hash = read_hash(&file_path);
                if hash.is_some() && hash == last_hash {
                    log::debug!("{} saved without content change, skipping", file);
                    continue;
                }

                match handle_render(file, opts) {
                    Ok(()) => {
                        last_render = Instant::now();
                        last_hash = hash;
                    }
                    Err(e) => {
                        eprintln!("{} {}", "Render error:".red().bold(), e);
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // Keep looping
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

fn read_hash(path: &Path) -> Option<String> {
    std::fs::read_to_string(path)
        .ok()
        .map(|content| content_hash(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_content(content: &str, opts: &RenderOpts) -> Result<String> {
        render_result(&topic_markdown::parse_with(content, &opts.parser), opts)
    }

    fn opts(format: RenderFormat) -> RenderOpts {
        RenderOpts {
            format,
            parser: ParserOptions::default(),
            render: RenderOptions::default(),
            page_title: None,
            quiet: true,
        }
    }

    #[test]
    fn test_hash_is_stable_and_content_sensitive() {
        assert_eq!(content_hash("# A"), content_hash("# A"));
        assert_ne!(content_hash("# A"), content_hash("# B"));
        assert_eq!(content_hash("").len(), 64);
    }

    #[test]
    fn test_render_json_lists_blocks_and_diagnostics() {
        let out = render_content("# T\n\n```\nopen", &opts(RenderFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["blocks"][0]["kind"], "Heading");
        assert_eq!(value["diagnostics"][0]["code"], "P001");
    }

    #[test]
    fn test_render_result_reuses_parsed_diagnostics() {
        let result = topic_markdown::parse("| a | b |\n| 1 |");
        let out = render_result(&result, &opts(RenderFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["diagnostics"][0]["code"], "P003");
        assert_eq!(value["diagnostics"][0]["line"], 2);
    }

    #[test]
    fn test_render_page_uses_configured_title() {
        let mut o = opts(RenderFormat::Page);
        o.page_title = Some("Week 3".into());
        let out = render_content("# Heading", &o).unwrap();
        assert!(out.contains("<title>Week 3</title>"));
    }

    #[test]
    fn test_render_html_respects_parser_options() {
        let mut o = opts(RenderFormat::Html);
        o.parser.drop_table_separator = true;
        let out = render_content("| a |\n|---|\n| b |", &o).unwrap();
        assert!(!out.contains("---"));
        assert!(out.contains("<td>b</td>"));
    }
}
