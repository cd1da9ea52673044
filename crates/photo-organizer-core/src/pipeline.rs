use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::config::OrganizerConfig;
use crate::date::metadata::{ExifTool, MetadataReader};
use crate::date::DateResolver;
use crate::error::PlacementError;
use crate::hasher::{self, DedupIndex};
use crate::media::{MediaFile, MediaSelection};
use crate::placement::Placement;
use crate::writer;

/// Counters for one run. `files_considered` counts every supported source
/// file regardless of outcome; the remaining fields break skips down by reason.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub existing_indexed: u64,
    pub files_considered: u64,
    pub copied: u64,
    pub duplicates: u64,
    pub unresolved: u64,
    pub collisions: u64,
    pub hash_failures: u64,
    pub copy_failures: u64,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn skipped(&self) -> u64 {
        self.files_considered - self.copied
    }

    fn record(&mut self, outcome: &FileOutcome) {
        self.files_considered += 1;
        match outcome {
            FileOutcome::Copied(_) => self.copied += 1,
            FileOutcome::Duplicate => self.duplicates += 1,
            FileOutcome::HashFailed => self.hash_failures += 1,
            FileOutcome::Unresolved => self.unresolved += 1,
            FileOutcome::Collision(_) => self.collisions += 1,
            FileOutcome::CopyFailed => self.copy_failures += 1,
        }
    }
}

/// What happened to a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Copied(PathBuf),
    Duplicate,
    HashFailed,
    Unresolved,
    Collision(PathBuf),
    CopyFailed,
}

/// Walks the source tree and places every new file by date.
///
/// The dedup index and day counters live here for the lifetime of the
/// organizer. Counters start from zero for every organizer; they are not
/// recovered from names already in the destination, so two organizers that do
/// not share an index can number the same day differently.
pub struct Organizer {
    config: OrganizerConfig,
    resolver: DateResolver,
    index: DedupIndex,
    placement: Placement,
}

impl Organizer {
    /// Organizer backed by the configured ExifTool executable.
    pub fn new(config: OrganizerConfig) -> Self {
        let tool = ExifTool::new(config.exiftool.clone());
        Self::with_reader(config, Box::new(tool))
    }

    pub fn with_reader(config: OrganizerConfig, reader: Box<dyn MetadataReader>) -> Self {
        let resolver = DateResolver::new(reader).with_guess(config.guess_from_names);
        let placement = Placement::new(config.destination());
        Self {
            config,
            resolver,
            index: DedupIndex::new(),
            placement,
        }
    }

    /// Start from an index carried over from an earlier run.
    pub fn with_index(mut self, index: DedupIndex) -> Self {
        self.index = index;
        self
    }

    pub fn into_index(self) -> DedupIndex {
        self.index
    }

    /// Seed the index from the destination, then ingest the source.
    pub fn run(&mut self) -> RunSummary {
        let started = Instant::now();
        let existing_indexed = self.seed_index();
        let mut summary = self.ingest();
        summary.existing_indexed = existing_indexed;
        summary.elapsed = started.elapsed();
        summary
    }

    /// Phase A: hash every supported file already in the destination.
    /// Returns the number of files indexed.
    pub fn seed_index(&mut self) -> u64 {
        let dest = self.placement.root().to_path_buf();
        tracing::info!("Scanning existing files in destination...");

        let mut count = 0u64;
        for path in supported_files(&dest, self.config.media) {
            match hasher::hash_file(&path, self.config.hash) {
                Ok(hash) => {
                    count += 1;
                    self.index.insert(hash);
                    tracing::debug!("Found {} existing file: '{}'", count, path.display());
                }
                Err(e) => tracing::error!("Error processing existing file: {}", e),
            }
        }
        count
    }

    /// Phase B: hash, dedup, resolve, place and copy every supported source file.
    pub fn ingest(&mut self) -> RunSummary {
        let started = Instant::now();
        let source = self.config.source.clone();
        tracing::info!(
            "Processing all files from '{}' into '{}'...",
            source.display(),
            self.placement.root().display()
        );

        let mut summary = RunSummary::default();
        for path in supported_files(&source, self.config.media) {
            let Some(mut file) = MediaFile::new(path) else {
                continue;
            };
            let seq = summary.files_considered + 1;
            let outcome = self.process_file(seq, &mut file);
            summary.record(&outcome);
        }

        tracing::info!("Processed {} files.", summary.files_considered);
        summary.elapsed = started.elapsed();
        summary
    }

    fn process_file(&mut self, seq: u64, file: &mut MediaFile) -> FileOutcome {
        let shown = file.path.display().to_string();

        match hasher::hash_file(&file.path, self.config.hash) {
            Ok(hash) => {
                if !self.index.insert(hash.clone()) {
                    tracing::warn!("Skipping {} duplicate file: '{}'", seq, shown);
                    return FileOutcome::Duplicate;
                }
                file.hash = Some(hash);
            }
            Err(e) => {
                tracing::error!("Error checking {} file hash: {}", seq, e);
                return FileOutcome::HashFailed;
            }
        }

        let Some(resolved) = self.resolver.resolve(file) else {
            tracing::warn!("Skipping {} '{}' - Could not determine date", seq, shown);
            return FileOutcome::Unresolved;
        };
        file.date = Some(resolved);

        let target = match self.placement.place(&resolved.date, &file.extension) {
            Ok(target) => target,
            Err(PlacementError::Collision { path }) => {
                tracing::warn!(
                    "Skipping {} '{}' - Target file already exists: '{}'",
                    seq,
                    shown,
                    path.display()
                );
                return FileOutcome::Collision(path);
            }
            Err(e) => {
                tracing::error!("Error placing {} '{}': {}", seq, shown, e);
                return FileOutcome::CopyFailed;
            }
        };

        match writer::copy_with_times(&file.path, &target) {
            Ok(_) => {
                tracing::debug!(
                    "Successfully copied ({}): '{}' -> '{}' (date from {})",
                    seq,
                    shown,
                    target.display(),
                    resolved.source
                );
                FileOutcome::Copied(target)
            }
            Err(e) => {
                tracing::error!("Error copying {} '{}': {}", seq, shown, e);
                FileOutcome::CopyFailed
            }
        }
    }
}

/// Supported files under `root`, in a stable (file-name sorted) order.
/// Symlinks are yielded unresolved; reading them follows the link. Walk errors
/// are logged and skipped.
pub fn supported_files(root: &Path, media: MediaSelection) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::error!("Error walking directory: {}", e);
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .filter(move |path| media.matches(path))
}

/// `HH:MM:SS.cc`
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    let centis = elapsed.subsec_millis() / 10;
    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}
