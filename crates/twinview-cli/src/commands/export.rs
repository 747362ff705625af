use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use twinview_core::config::ReviewConfig;
use twinview_core::workspace::ReviewWorkspace;

use crate::summary::{print_discovery_summary, print_export_summary};

#[derive(Args)]
pub struct ExportArgs {
    /// Folder with the original images
    pub original: PathBuf,

    /// Folder with the translated images
    pub translated: PathBuf,

    /// Export root; needs-fix/ and approved/ are created inside
    pub destination: PathBuf,

    /// Filenames to route into the needs-fix folder
    #[arg(long = "needs-fix", num_args = 1..)]
    pub needs_fix: Vec<String>,

    /// Keep pairs whose dimensions differ
    #[arg(long)]
    pub allow_mismatched: bool,
}

pub fn run(args: &ExportArgs, mut config: ReviewConfig) -> Result<()> {
    if args.allow_mismatched {
        config.discovery.require_equal_dimensions = false;
    }
    // Headless export never produces annotations.
    config.annotation.autosave = false;

    let mut workspace = ReviewWorkspace::new(config).context("Invalid review config")?;
    let discovery = workspace
        .open_folders(&args.original, &args.translated)
        .context("Failed to scan folders")?;
    print_discovery_summary(&args.original, &args.translated, &discovery);

    if workspace.session().is_empty() {
        bail!("No image pairs to export");
    }

    for name in &args.needs_fix {
        if !workspace.session().pairs().iter().any(|p| &p.filename == name) {
            tracing::warn!(filename = %name, "--needs-fix names a file that is not in the pair list");
            continue;
        }
        workspace.session_mut().set_needs_fix(name, true);
    }
    tracing::debug!(
        flagged = ?workspace.session().flagged().collect::<Vec<_>>(),
        "Needs-fix selection"
    );

    let pb = ProgressBar::new(workspace.session().len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Exporting");

    let report = workspace
        .export_all(&args.destination, |done, _total| {
            pb.set_position(done as u64);
        })
        .with_context(|| format!("Export to {} failed", args.destination.display()))?;

    pb.finish_with_message("Done");
    print_export_summary(&args.destination, &report);

    Ok(())
}
