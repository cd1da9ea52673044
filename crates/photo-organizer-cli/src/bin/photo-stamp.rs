use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use photo_organizer_cli::logging;
use photo_organizer_core::stamp;

#[derive(Parser)]
#[command(
    name = "photo-stamp",
    version,
    about = "Set file times from the date-time embedded in each filename"
)]
struct Cli {
    /// Directory to walk recursively
    root: PathBuf,

    /// Debug output on the console
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, None);

    if !cli.root.is_dir() {
        anyhow::bail!("{} is not a valid directory", cli.root.display());
    }

    let summary = stamp::stamp_tree(&cli.root)
        .with_context(|| format!("stamping {}", cli.root.display()))?;

    tracing::info!(
        "Done! {} files updated, {} skipped",
        summary.updated,
        summary.skipped.len()
    );
    Ok(())
}
