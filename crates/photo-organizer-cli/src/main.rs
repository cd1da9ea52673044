use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, ValueEnum};
use photo_organizer_cli::logging;
use photo_organizer_core::{
    format_elapsed, HashAlgorithm, MediaSelection, OrganizeError, OrganizerConfig,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Media {
    All,
    Photo,
    Video,
}

impl From<Media> for MediaSelection {
    fn from(media: Media) -> Self {
        match media {
            Media::All => MediaSelection::All,
            Media::Photo => MediaSelection::Photo,
            Media::Video => MediaSelection::Video,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Hash {
    Md5,
    Sha256,
}

impl From<Hash> for HashAlgorithm {
    fn from(hash: Hash) -> Self {
        match hash {
            Hash::Md5 => HashAlgorithm::Md5,
            Hash::Sha256 => HashAlgorithm::Sha256,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "photo-organizer",
    version,
    about = "Copy photos and videos into a date-partitioned tree, skipping content already present"
)]
struct Cli {
    /// Directory tree to ingest
    source: PathBuf,

    /// Base destination directory
    dest: PathBuf,

    /// ExifTool executable (bare names are looked up on PATH)
    #[arg(long, default_value = "exiftool")]
    exiftool: PathBuf,

    /// Which media class to organize; photo/video runs go under <dest>/Photo or <dest>/Video
    #[arg(long, value_enum, default_value_t = Media::All)]
    media: Media,

    /// Content hash used for duplicate detection
    #[arg(long, value_enum, default_value_t = Hash::Md5)]
    hash: Hash,

    /// Disable date guessing from file and directory names
    #[arg(long)]
    no_guess: bool,

    /// Directory for the run log (default: <dest>)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log to the console only
    #[arg(long, conflicts_with = "log_dir")]
    no_log_file: bool,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Debug output on the console
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let t_total = Instant::now();
    let started = Local::now();

    let config = OrganizerConfig::new(cli.source, cli.dest)
        .with_exiftool(cli.exiftool)
        .with_media(cli.media.into())
        .with_hash(cli.hash.into())
        .with_guess(!cli.no_guess);

    let log_path = (!cli.no_log_file).then(|| {
        cli.log_dir
            .clone()
            .unwrap_or_else(|| config.base_dir.clone())
            .join(logging::log_file_name(config.media, &started))
    });
    logging::init(cli.verbose, log_path.as_deref());

    tracing::info!(
        "Starting photo organization at {}",
        started.format(TIMESTAMP_FORMAT)
    );
    tracing::debug!("Configuration: {:?}", config);

    let summary = match photo_organizer_core::organize(config) {
        Ok(summary) => summary,
        Err(OrganizeError::Preflight(errors)) => {
            tracing::error!("Error(s) found:");
            for error in &errors {
                tracing::error!("- {}", error);
            }
            tracing::error!("Please correct these errors and run the script again.");
            return Err(OrganizeError::Preflight(errors).into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        "{} copied, {} skipped ({} duplicates, {} undated, {} collisions, {} hash errors, {} copy errors)",
        summary.copied,
        summary.skipped(),
        summary.duplicates,
        summary.unresolved,
        summary.collisions,
        summary.hash_failures,
        summary.copy_failures,
    );
    tracing::info!(
        "Photo organization completed at {} (time: {})",
        Local::now().format(TIMESTAMP_FORMAT),
        format_elapsed(t_total.elapsed())
    );

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
        println!("{}", json);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_an_all_media_md5_run() {
        let cli = Cli::try_parse_from(["photo-organizer", "in", "out"]).unwrap();
        assert!(matches!(cli.media, Media::All));
        assert!(matches!(cli.hash, Hash::Md5));
        assert_eq!(cli.exiftool, PathBuf::from("exiftool"));
        assert!(!cli.no_guess);
    }

    #[test]
    fn log_dir_conflicts_with_no_log_file() {
        let parsed =
            Cli::try_parse_from(["photo-organizer", "in", "out", "--no-log-file", "--log-dir", "x"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn media_maps_onto_selection() {
        assert_eq!(MediaSelection::from(Media::Video), MediaSelection::Video);
        assert_eq!(HashAlgorithm::from(Hash::Sha256), HashAlgorithm::Sha256);
    }
}
