use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::error::PlacementError;

/// Per-day sequence numbers for one run. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct DayCounter {
    counts: HashMap<NaiveDate, u32>,
}

impl DayCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the counter for `day`.
    pub fn next(&mut self, day: NaiveDate) -> u32 {
        let count = self.counts.entry(day).or_insert(0);
        *count += 1;
        *count
    }

    pub fn current(&self, day: NaiveDate) -> u32 {
        self.counts.get(&day).copied().unwrap_or(0)
    }
}

/// Computes `<root>/YYYY/MM/YYYY-MM-DD_HH-MM_NNN.ext` destinations.
#[derive(Debug)]
pub struct Placement {
    root: PathBuf,
    counters: DayCounter,
}

impl Placement {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            counters: DayCounter::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn counters(&self) -> &DayCounter {
        &self.counters
    }

    /// Assign the next destination for `date`.
    ///
    /// The day counter advances even when the composed path already exists;
    /// the collision is reported and the number is not reused.
    pub fn place(&mut self, date: &NaiveDateTime, extension: &str) -> Result<PathBuf, PlacementError> {
        let target_dir = self
            .root
            .join(format!("{:04}", date.year()))
            .join(format!("{:02}", date.month()));
        fs::create_dir_all(&target_dir).map_err(|source| PlacementError::CreateDir {
            path: target_dir.clone(),
            source,
        })?;

        let counter = self.counters.next(date.date());
        let target = target_dir.join(file_name(date, counter, extension));

        if target.exists() {
            return Err(PlacementError::Collision { path: target });
        }
        Ok(target)
    }
}

/// `YYYY-MM-DD_HH-MM_NNN.ext`
pub fn file_name(date: &NaiveDateTime, counter: u32, extension: &str) -> String {
    format!(
        "{:04}-{:02}-{:02}_{:02}-{:02}_{:03}.{}",
        date.year(),
        date.month(),
        date.day(),
        date.hour(),
        date.minute(),
        counter,
        extension.to_ascii_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn file_name_layout() {
        assert_eq!(
            file_name(&at(2024, 3, 5, 7, 9), 1, "JPG"),
            "2024-03-05_07-09_001.jpg"
        );
        assert_eq!(
            file_name(&at(999, 12, 31, 23, 59), 1234, "mov"),
            "0999-12-31_23-59_1234.mov"
        );
    }

    #[test]
    fn counters_are_per_day() {
        let dir = tempdir().unwrap();
        let mut placement = Placement::new(dir.path());

        let a = placement.place(&at(2024, 3, 15, 9, 0), "jpg").unwrap();
        let b = placement.place(&at(2024, 3, 15, 18, 45), "mp4").unwrap();
        let c = placement.place(&at(2024, 3, 16, 9, 0), "jpg").unwrap();

        assert_eq!(a, dir.path().join("2024/03/2024-03-15_09-00_001.jpg"));
        assert_eq!(b, dir.path().join("2024/03/2024-03-15_18-45_002.mp4"));
        assert_eq!(c, dir.path().join("2024/03/2024-03-16_09-00_001.jpg"));
        assert!(dir.path().join("2024/03").is_dir());
    }

    #[test]
    fn collision_still_advances_counter() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("2024/03/2024-03-15_09-00_001.jpg");
        fs::create_dir_all(existing.parent().unwrap()).unwrap();
        fs::write(&existing, b"already here").unwrap();

        let mut placement = Placement::new(dir.path());
        let err = placement.place(&at(2024, 3, 15, 9, 0), "jpg").unwrap_err();
        assert!(matches!(err, PlacementError::Collision { ref path } if *path == existing));
        assert_eq!(placement.counters().current(at(2024, 3, 15, 0, 0).date()), 1);

        let next = placement.place(&at(2024, 3, 15, 9, 0), "jpg").unwrap();
        assert_eq!(next, dir.path().join("2024/03/2024-03-15_09-00_002.jpg"));
        assert_eq!(fs::read(&existing).unwrap(), b"already here");
    }
}
