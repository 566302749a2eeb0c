//! blog-gen - Writes the blog's posts, authors, and tags as Rust statics
//!
//! ```text
//! blog-gen --output src/generated/posts.rs --crate-name blog -v debug
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use structgen::prelude::*;
use structgen_logging::{LogArgs, LogLevel, ReloadHandle, init_logging};
use tracing::{debug, info, warn};

mod model;

#[derive(Parser)]
#[command(name = "blog-gen")]
#[command(author, version, about = "Generate static blog data", long_about = None)]
struct Cli {
    /// Output file (default: post_generated.rs)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generator configuration (TOML); command line flags take precedence, except that a
    /// `log_level` key replaces the startup verbosity once the file is read
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Name of the crate the generated file is compiled into
    #[arg(long)]
    crate_name: Option<String>,

    /// Declaration style (auto, lazy, static)
    #[arg(long, value_parser = parse_style)]
    style: Option<DeclarationStyle>,

    /// Print the generated source instead of writing it
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    log: LogArgs,
}

fn parse_style(s: &str) -> Result<DeclarationStyle, String> {
    match s.to_ascii_lowercase().as_str() {
        "auto" => Ok(DeclarationStyle::Auto),
        "lazy" => Ok(DeclarationStyle::Lazy),
        "static" => Ok(DeclarationStyle::Static),
        other => Err(format!("unknown declaration style: {other}")),
    }
}

/// Keys of the config file read by this tool rather than the generator
#[derive(Debug, Default, Deserialize)]
struct ToolSettings {
    log_level: Option<String>,
}

struct Loaded {
    config: GeneratorConfig,
    log_level: Option<LogLevel>,
}

fn load_config(cli: &Cli) -> Result<Loaded> {
    let (mut config, log_level) = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let config = GeneratorConfig::from_toml(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            let settings: ToolSettings = toml::from_str(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            let log_level = settings
                .log_level
                .map(|level| level.parse::<LogLevel>())
                .transpose()
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid log_level in {}", path.display()))?;
            (config, log_level)
        }
        None => (GeneratorConfig::default(), None),
    };

    if let Some(output) = &cli.output {
        config = config.with_output_file(output);
    }
    if let Some(name) = &cli.crate_name {
        config = config.with_crate_name(name);
    }
    if let Some(style) = cli.style {
        config = config.with_declaration_style(style);
    }
    Ok(Loaded { config, log_level })
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log.to_options()).context("Failed to initialize logging")?;

    let Loaded { config, log_level } = load_config(&cli)?;
    if let Some(level) = log_level {
        ReloadHandle::global()
            .reload_level(level)
            .map_err(anyhow::Error::msg)?;
        debug!(%level, "log level set from config");
    }

    let posts = model::posts();
    let authors = model::authors();
    let tags = model::tags();

    let mut generator = Generator::new(config, &posts)
        .reference(&authors)
        .reference(&tags);

    let output = if cli.dry_run {
        generator.render()?
    } else {
        generator.generate()?
    };

    for skipped in &output.unresolved {
        warn!(%skipped, "relationship left unresolved");
    }

    if cli.dry_run {
        println!("{}", output.source);
    } else {
        info!(
            path = %output.output_file.display(),
            style = %output.style,
            "generated blog data"
        );
    }

    Ok(())
}
