use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use twinview_core::config::ReviewConfig;
use twinview_core::discovery::discover_pairs;

use crate::summary::print_discovery_summary;

#[derive(Args)]
pub struct PairsArgs {
    /// Folder with the original images
    pub original: PathBuf,

    /// Folder with the translated images
    pub translated: PathBuf,

    /// Keep pairs whose dimensions differ
    #[arg(long)]
    pub allow_mismatched: bool,
}

pub fn run(args: &PairsArgs, config: &ReviewConfig) -> Result<()> {
    let require_equal = config.discovery.require_equal_dimensions && !args.allow_mismatched;
    let discovery = discover_pairs(&args.original, &args.translated, require_equal)
        .context("Failed to scan folders")?;

    print_discovery_summary(&args.original, &args.translated, &discovery);
    Ok(())
}
