pub mod analyze;
pub mod health;
pub mod personalities;
pub mod schema;

use crate::config::{default_config_path, Config};
use crate::error::ConfigError;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "aita")]
#[command(
    author,
    version,
    about = "Ask a panel of LLM personalities whether you were the asshole"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Judge a story with every personality
    Analyze(AnalyzeArgs),

    /// List the personality panel
    Personalities(PersonalitiesArgs),

    /// Report credential presence and completion service reachability
    Health(HealthArgs),

    /// Print JSON Schema for config validation
    Schema(SchemaArgs),
}

#[derive(Parser, Clone)]
pub struct ConfigArgs {
    /// Path to config file (default: aita.yaml, used only if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config, ConfigError> {
        let path = self.config.clone().unwrap_or_else(default_config_path);
        info!("Loading config from {:?}", path);
        Config::load_or_default(&path, self.config.is_some())
    }

    /// Whether a non-blank key was supplied
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Parser, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Story text (reads --file or stdin when omitted)
    #[arg(short, long, conflicts_with = "file")]
    pub story: Option<String>,

    /// Read the story from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Treat the input as a raw `{"story": ...}` request body
    #[arg(long, conflicts_with = "story")]
    pub json: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Also write the rendered output to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override model
    #[arg(long)]
    pub model: Option<String>,

    /// Override max parallel personality calls
    #[arg(long)]
    pub concurrency: Option<usize>,
}

#[derive(Parser, Clone)]
pub struct PersonalitiesArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Clone)]
pub struct HealthArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Skip the completion service ping
    #[arg(long)]
    pub offline: bool,
}

#[derive(Parser, Clone)]
pub struct SchemaArgs {
    /// Print the analyze response schema instead of the config schema
    #[arg(long)]
    pub response: bool,
}
