//! Alexandria CLI binary.
//!
//! This binary provides command-line access to Alexandria's functionality:
//! - Search Semantic Scholar for papers and authors
//! - Walk citation graphs and fetch recommendations
//! - Export fetched papers as BibTeX

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, handle_command};

    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = alexandria::AlexandriaConfig::load()?;

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Execute the requested command
    handle_command(&config, cli.command).await?;

    Ok(())
}
