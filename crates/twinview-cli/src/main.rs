mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use twinview_core::config::ReviewConfig;

#[derive(Parser)]
#[command(name = "twinview", about = "Side-by-side review of original and translated images")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Review config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List image pairs shared by two folders
    Pairs(commands::pairs::PairsArgs),
    /// Export every pair into needs-fix/approved folders
    Export(commands::export::ExportArgs),
    /// Print or save the default review config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match cli.config {
        Some(ref path) => ReviewConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReviewConfig::default(),
    };

    match &cli.command {
        Commands::Pairs(args) => commands::pairs::run(args, &config),
        Commands::Export(args) => commands::export::run(args, config),
        Commands::Config(args) => commands::config::run(args, &config),
    }
}
