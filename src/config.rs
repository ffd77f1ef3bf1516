use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use topic_markdown::{InlineMatching, ParserOptions, RenderOptions};

/// File name looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "topicmark.json";

/// Top-level topicmark.json schema.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicmarkConfig {
    pub parser: ParserOptions,
    pub render: RenderSection,
}

/// Output format for `topicmark render`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    #[default]
    Terminal,
    Html,
    Page,
    Json,
}

/// Rendering defaults.
#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderSection {
    pub format: RenderFormat,
    pub embed_videos: bool,
    pub inline_matching: InlineMatching,
    pub page_title: Option<String>,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            format: RenderFormat::Terminal,
            embed_videos: true,
            inline_matching: InlineMatching::Priority,
            page_title: None,
        }
    }
}

impl RenderSection {
    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            inline_matching: self.inline_matching,
            embed_videos: self.embed_videos,
        }
    }
}

/// Load config from an explicit path, or from `topicmark.json` in `dir`.
///
/// A missing default file yields defaults; a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<TopicmarkConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = dir.join(CONFIG_FILE);
            if !path.exists() {
                log::debug!("no {} in {}, using defaults", CONFIG_FILE, dir.display());
                return Ok(TopicmarkConfig::default());
            }
            path
        }
    };

    let raw = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config: TopicmarkConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
}
