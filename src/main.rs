//! templar CLI entrypoint
//! Parses command-line arguments and dispatches to the template engines.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use std::io::Read;
use std::path::{Path, PathBuf};

use templar::config::EnvConfigReader;
use templar::markdown::to_html;
use templar::{GenerationConfig, MultiTemplateEngine, TemplateEngine};

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "templar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Debug)]
struct LookupArgs {
    /// Generation config file (YAML or TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// User template directory
    #[arg(long)]
    template_dir: Option<PathBuf>,
    /// Library flavor to prefer
    #[arg(long)]
    library: Option<String>,
    /// Bundled template folder of the target
    #[arg(long)]
    embedded_template_dir: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Render a template and print the result
    Render {
        /// Logical template name
        name: String,
        /// Data model file (JSON or YAML)
        #[arg(long)]
        data: Option<PathBuf>,
        #[command(flatten)]
        lookup: LookupArgs,
    },
    /// Print where a template name resolves to
    Locate {
        /// Logical template name
        name: String,
        #[command(flatten)]
        lookup: LookupArgs,
    },
    /// Convert Markdown to HTML
    Markdown {
        /// Markdown file, read from stdin when omitted
        file: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered output can be piped
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render { name, data, lookup } => {
            let engine = MultiTemplateEngine::new(load_config(&lookup)?);
            let data = match data {
                Some(path) => load_data(&path)?,
                None => Value::Object(serde_json::Map::new()),
            };

            info!(template = %name, "Rendering template");
            let rendered = engine
                .render(&name, &data)
                .with_context(|| format!("Failed to render template '{name}'"))?;
            print!("{rendered}");
        }
        Commands::Locate { name, lookup } => {
            let engine = MultiTemplateEngine::new(load_config(&lookup)?);
            let path = engine
                .locate(&name)
                .with_context(|| format!("Failed to locate template '{name}'"))?;
            println!("{path}");
        }
        Commands::Markdown { file } => {
            let markdown = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut input = String::new();
                    std::io::stdin()
                        .read_to_string(&mut input)
                        .context("Failed to read stdin")?;
                    input
                }
            };
            print!("{}", to_html(Some(&markdown)));
        }
    }
    Ok(())
}

/// Build the generation config: file, then environment, then flags
fn load_config(args: &LookupArgs) -> anyhow::Result<GenerationConfig> {
    let config = match &args.config {
        Some(path) => GenerationConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GenerationConfig::discover().context("Failed to load config")?,
    };
    let mut config = config.with_overrides(&EnvConfigReader);

    if let Some(dir) = &args.template_dir {
        config.template_dir = dir.clone();
    }
    if let Some(library) = &args.library {
        config.library = Some(library.clone());
    }
    if let Some(dir) = &args.embedded_template_dir {
        config.embedded_template_dir = dir.clone();
    }

    debug!(?config, "Resolved generation config");
    Ok(config)
}

fn load_data(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file {}", path.display()))?;

    let data = match path.extension().and_then(|e| e.to_str()) {
        Some("yml" | "yaml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    Ok(data)
}
