pub mod metadata;
pub mod parse;
pub mod text;

use chrono::NaiveDateTime;
use std::fmt;

use crate::media::MediaFile;
use metadata::{DateTag, MetadataReader};

pub use parse::parse_date;
pub use text::extract_date_from_text;

/// Where a resolved date came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Metadata(DateTag),
    Filename,
    Directory,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSource::Metadata(tag) => write!(f, "EXIF {}", tag.as_str()),
            DateSource::Filename => f.write_str("filename"),
            DateSource::Directory => f.write_str("directory"),
        }
    }
}

/// Result of date resolution: date + the source that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateResult {
    pub date: NaiveDateTime,
    pub source: DateSource,
}

/// Resolves a file's date: metadata, then filename, then parent directory name.
pub struct DateResolver {
    reader: Box<dyn MetadataReader>,
    allow_guess: bool,
}

impl DateResolver {
    pub fn new(reader: Box<dyn MetadataReader>) -> Self {
        Self {
            reader,
            allow_guess: true,
        }
    }

    /// Disable the filename and directory-name fallbacks.
    pub fn with_guess(mut self, allow_guess: bool) -> Self {
        self.allow_guess = allow_guess;
        self
    }

    pub fn resolve(&self, file: &MediaFile) -> Option<DateResult> {
        tracing::debug!("Processing file: '{}'", file.path.display());

        // 1. Metadata
        if let Some((tag, date)) = metadata::extract_metadata_date(self.reader.as_ref(), &file.path) {
            return Some(DateResult {
                date,
                source: DateSource::Metadata(tag),
            });
        }

        if !self.allow_guess {
            tracing::warn!("Could not determine date from metadata (name guessing disabled)");
            return None;
        }

        // 2. Filename
        if let Some(date) = text::extract_date_from_text(file.file_name()) {
            tracing::debug!("Successfully got date from filename: {}", date);
            return Some(DateResult {
                date,
                source: DateSource::Filename,
            });
        }

        // 3. Parent directory name
        if let Some(date) = file.parent_name().and_then(text::extract_date_from_text) {
            tracing::debug!("Successfully got date from directory: {}", date);
            return Some(DateResult {
                date,
                source: DateSource::Directory,
            });
        }

        tracing::warn!("Could not determine date from any source");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetadataError;
    use chrono::NaiveDate;
    use metadata::DateTags;
    use std::path::{Path, PathBuf};

    struct NoMetadata;

    impl MetadataReader for NoMetadata {
        fn read_date_tags(&self, path: &Path) -> Result<DateTags, MetadataError> {
            Err(MetadataError::NoOutput {
                path: path.to_path_buf(),
            })
        }
    }

    struct Tagged(&'static str);

    impl MetadataReader for Tagged {
        fn read_date_tags(&self, _path: &Path) -> Result<DateTags, MetadataError> {
            Ok(DateTags::from([(DateTag::CreateDate, self.0.to_string())]))
        }
    }

    fn file(path: &str) -> MediaFile {
        MediaFile::new(PathBuf::from(path)).unwrap()
    }

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn metadata_short_circuits() {
        let resolver = DateResolver::new(Box::new(Tagged("2018:08:08 08:08:08")));
        let result = resolver.resolve(&file("/in/2024-03-15_x.jpg")).unwrap();
        assert_eq!(result.source, DateSource::Metadata(DateTag::CreateDate));
        assert_eq!(result.date.to_string(), "2018-08-08 08:08:08");
    }

    #[test]
    fn falls_back_to_filename() {
        let resolver = DateResolver::new(Box::new(NoMetadata));
        let result = resolver.resolve(&file("/in/2024-03-15_vacation.jpg")).unwrap();
        assert_eq!(result.source, DateSource::Filename);
        assert_eq!(result.date, midnight(2024, 3, 15));
    }

    #[test]
    fn falls_back_to_directory() {
        let resolver = DateResolver::new(Box::new(NoMetadata));
        let result = resolver.resolve(&file("/in/March 5, 2024/IMG_0001.JPG")).unwrap();
        assert_eq!(result.source, DateSource::Directory);
        assert_eq!(result.date, midnight(2024, 3, 5));
    }

    #[test]
    fn unresolved_without_substitution() {
        let resolver = DateResolver::new(Box::new(NoMetadata));
        assert!(resolver.resolve(&file("/in/misc/20241332_999999.jpg")).is_none());
    }

    #[test]
    fn guessing_can_be_disabled() {
        let resolver = DateResolver::new(Box::new(NoMetadata)).with_guess(false);
        assert!(resolver.resolve(&file("/in/2024-03-15_vacation.jpg")).is_none());
    }
}
