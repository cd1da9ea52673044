//! Date-partitioned photo and video organizer.
//!
//! A run seeds a content-hash index from the destination tree, then walks the
//! source tree. Each new file gets a date from its metadata, filename or parent
//! directory name, and is copied to
//! `<dest>/<YYYY>/<MM>/<YYYY>-<MM>-<DD>_<HH>-<MM>_<NNN>.<ext>`.

pub mod config;
pub mod date;
pub mod error;
pub mod hasher;
pub mod media;
pub mod pipeline;
pub mod placement;
pub mod preflight;
pub mod stamp;
pub mod writer;

pub use config::OrganizerConfig;
pub use date::{DateResolver, DateResult, DateSource};
pub use error::{OrganizeError, Result};
pub use hasher::{DedupIndex, HashAlgorithm};
pub use media::MediaSelection;
pub use pipeline::{format_elapsed, Organizer, RunSummary};

/// Validate the configuration, then run both phases.
pub fn organize(config: OrganizerConfig) -> Result<RunSummary> {
    preflight::verify_paths(&config).map_err(OrganizeError::Preflight)?;
    let mut organizer = Organizer::new(config);
    Ok(organizer.run())
}
