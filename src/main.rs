use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use topic_markdown::InlineMatching;

mod check;
mod config;
mod render;

use config::RenderFormat;

#[derive(Parser)]
#[command(name = "topicmark", version, about = "Parse and render markdown topic content")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log parser decisions to stderr
    #[arg(long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Config file (default: ./topicmark.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a topic file
    Render {
        /// Path to the markdown topic file
        file: String,

        /// Output format (default: from config, else terminal)
        #[arg(long, value_enum)]
        format: Option<RenderFormat>,

        /// Re-render whenever the file is saved
        #[arg(long)]
        watch: bool,

        /// Title for `--format page`
        #[arg(long)]
        title: Option<String>,
    },

    /// Resolve one line of text into inline spans (JSON)
    Inline {
        /// The line to resolve
        text: String,

        /// Earliest match wins instead of pattern priority
        #[arg(long)]
        leftmost: bool,
    },

    /// Report diagnostics for topic files or directories
    Check {
        /// Files or directories to check
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Warn
    };

    // RUST_LOG, when set, takes precedence over the flags.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let cwd = std::env::current_dir()?;
    let config = config::load_config(cli.config.as_deref(), &cwd)?;

    match cli.command {
        Commands::Render {
            file,
            format,
            watch,
            title,
        } => {
            let opts = render::RenderOpts {
                format: format.unwrap_or(config.render.format),
                parser: config.parser,
                render: config.render.options(),
                page_title: title.or_else(|| config.render.page_title.clone()),
                quiet: cli.quiet,
            };
            if watch {
                render::watch_and_render(&file, &opts)?;
            } else {
                render::handle_render(&file, &opts)?;
            }
        }
        Commands::Inline { text, leftmost } => {
            let matching = if leftmost {
                InlineMatching::Leftmost
            } else {
                config.render.inline_matching
            };
            let spans = topic_markdown::resolve_inline_with(&text, matching);
            println!("{}", serde_json::to_string_pretty(&spans)?);
        }
        Commands::Check { paths } => {
            if check::handle_check(&paths, &config.parser, cli.quiet)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
