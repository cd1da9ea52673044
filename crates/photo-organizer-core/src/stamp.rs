//! Rewrite file timestamps from a date-time embedded in the filename.
//!
//! No fallback sources and no dedup: a file either matches the pattern and
//! gets its times set, or it is listed in `skipped_files.log`.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use filetime::FileTime;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::{OrganizeError, Result};
use crate::media::MediaSelection;

pub const SKIP_LOG_NAME: &str = "skipped_files.log";

// 2025-05-26 at 13.10.43.jpg, 2024-12-20 At 11.27.27_8d769920.jpg, 20240922_113907.jpg
static STAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?P<year>[0-9]{4})[.\-]?(?P<month>[0-9]{2})[.\-]?(?P<day>[0-9]{2})",
        r"(?:[ _.\-]?(?:[aA]t)?[ _.\-]?)?",
        r"(?P<hour>[0-9]{2})[.\-:]?(?P<minute>[0-9]{2})[.\-:]?(?P<second>[0-9]{2})",
    ))
    .unwrap()
});

#[derive(Debug, Default)]
pub struct StampSummary {
    pub updated: u64,
    pub skipped: Vec<PathBuf>,
}

/// Date-time captured from a filename, if the pattern matches and the values
/// form a real calendar date.
pub fn date_from_filename(name: &str) -> Option<NaiveDateTime> {
    let caps = STAMP_RE.captures(name)?;
    let num = |key: &str| caps.name(key)?.as_str().parse::<u32>().ok();
    NaiveDate::from_ymd_opt(num("year")? as i32, num("month")?, num("day")?)?.and_hms_opt(
        num("hour")?,
        num("minute")?,
        num("second")?,
    )
}

/// Set access, modification and (on Windows) creation time, interpreting
/// `dt` as local time. A time skipped by a DST transition is moved an hour
/// forward.
pub fn apply_timestamp(path: &Path, dt: &NaiveDateTime) -> io::Result<()> {
    let local = resolve_local(dt, |t| t.and_local_timezone(Local).earliest()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} does not exist in the local timezone", dt),
        )
    })?;
    let ft = FileTime::from_unix_time(local.timestamp(), 0);
    filetime::set_file_times(path, ft, ft)?;
    set_created(path, local.into())
}

fn resolve_local<T>(dt: &NaiveDateTime, lookup: impl Fn(&NaiveDateTime) -> Option<T>) -> Option<T> {
    lookup(dt).or_else(|| lookup(&(*dt + Duration::hours(1))))
}

#[cfg(windows)]
fn set_created(path: &Path, time: std::time::SystemTime) -> io::Result<()> {
    use std::fs::FileTimes;
    use std::os::windows::fs::FileTimesExt;

    let file = OpenOptions::new().write(true).open(path)?;
    file.set_times(FileTimes::new().set_created(time))
}

#[cfg(not(windows))]
fn set_created(_path: &Path, _time: std::time::SystemTime) -> io::Result<()> {
    Ok(())
}

/// Walk `root` and stamp every supported file whose name carries a date-time.
/// Skipped paths are appended to `<root>/skipped_files.log`.
pub fn stamp_tree(root: &Path) -> Result<StampSummary> {
    let mut summary = StampSummary::default();

    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("Error walking directory: {}", e);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.into_path();
        if path.file_name().is_some_and(|n| n == SKIP_LOG_NAME) {
            continue;
        }

        if !MediaSelection::All.matches(&path) {
            summary.skipped.push(path);
            continue;
        }

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let Some(dt) = date_from_filename(name) else {
            summary.skipped.push(path);
            continue;
        };

        match apply_timestamp(&path, &dt) {
            Ok(()) => {
                tracing::info!("Updated: {} -> {}", path.display(), dt);
                summary.updated += 1;
            }
            Err(e) => {
                tracing::warn!("Error processing {}: {}", path.display(), e);
                summary.skipped.push(path);
            }
        }
    }

    if !summary.skipped.is_empty() {
        let log_path = root.join(SKIP_LOG_NAME);
        append_skipped(&log_path, &summary.skipped).map_err(|source| OrganizeError::Io {
            path: log_path.clone(),
            source,
        })?;
        tracing::info!("Skipped files logged to: {}", log_path.display());
    }

    Ok(summary)
}

fn append_skipped(log_path: &Path, skipped: &[PathBuf]) -> io::Result<()> {
    let mut file: File = OpenOptions::new().create(true).append(true).open(log_path)?;
    for path in skipped {
        writeln!(file, "{}", path.display())?;
    }
    Ok(())
}
