use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod error;
mod handler;
mod output;
mod parser;
mod personality;
mod provider;
mod runner;
mod story;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing so OPENAI_API_KEY from .env reaches clap's env fallback
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // RUST_LOG wins; otherwise only show logs with --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("aita=debug")
        } else {
            EnvFilter::new("aita=warn")
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args).await,
        Commands::Personalities(args) => cli::personalities::execute(args),
        Commands::Health(args) => cli::health::execute(args).await,
        Commands::Schema(args) => cli::schema::execute(args),
    }
}
