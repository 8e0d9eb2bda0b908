use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use stonepath_agent::run_session;
use stonepath_core::AgentConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional TOML file overriding the grid size and start cell
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Stdout carries the protocol, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => AgentConfig::default(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let report = run_session(stdin.lock(), stdout.lock(), &config)
        .context("Interactor session failed")?;

    info!(answer = report.answer(), moves = report.moves(), "session finished");
    Ok(())
}
