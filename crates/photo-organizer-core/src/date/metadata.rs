use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::parse::parse_date;
use crate::error::MetadataError;

/// Date tags requested from the metadata tool, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTag {
    DateTimeOriginal,
    CreateDate,
    FileModifyDate,
}

impl DateTag {
    pub const PRIORITY: [DateTag; 3] = [
        DateTag::DateTimeOriginal,
        DateTag::CreateDate,
        DateTag::FileModifyDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DateTag::DateTimeOriginal => "DateTimeOriginal",
            DateTag::CreateDate => "CreateDate",
            DateTag::FileModifyDate => "FileModifyDate",
        }
    }
}

/// Raw tag values reported for one file.
pub type DateTags = HashMap<DateTag, String>;

/// Source of raw date tags for a file.
pub trait MetadataReader {
    fn read_date_tags(&self, path: &Path) -> Result<DateTags, MetadataError>;
}

/// ExifTool invoked as a subprocess, once per file.
#[derive(Debug, Clone)]
pub struct ExifTool {
    program: PathBuf,
}

impl ExifTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MetadataReader for ExifTool {
    fn read_date_tags(&self, path: &Path) -> Result<DateTags, MetadataError> {
        tracing::debug!("Trying to read EXIF data from: {}", path.display());
        let mut cmd = Command::new(&self.program);
        cmd.arg("-json");
        for tag in DateTag::PRIORITY {
            cmd.arg(format!("-{}", tag.as_str()));
        }
        let output = cmd.arg(path).output().map_err(|source| MetadataError::Spawn {
            tool: self.program.clone(),
            source,
        })?;

        if !output.stderr.is_empty() {
            tracing::warn!(
                "Subprocess error: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        parse_tool_output(&output.stdout, path)
    }
}

/// Parse the tool's JSON array output; only the first record is used.
pub fn parse_tool_output(stdout: &[u8], path: &Path) -> Result<DateTags, MetadataError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Err(MetadataError::NoOutput {
            path: path.to_path_buf(),
        });
    }

    let records: Vec<Map<String, Value>> =
        serde_json::from_slice(stdout).map_err(|source| MetadataError::InvalidOutput {
            path: path.to_path_buf(),
            source,
        })?;

    let Some(first) = records.into_iter().next() else {
        return Err(MetadataError::NoOutput {
            path: path.to_path_buf(),
        });
    };

    Ok(DateTag::PRIORITY
        .into_iter()
        .filter_map(|tag| {
            let value = first.get(tag.as_str())?.as_str()?;
            Some((tag, value.to_string()))
        })
        .collect())
}

/// First tag, in priority order, whose value parses as a date.
///
/// Any tool failure is reported as `None`; the caller moves on to the next source.
pub fn extract_metadata_date(
    reader: &dyn MetadataReader,
    path: &Path,
) -> Option<(DateTag, NaiveDateTime)> {
    let tags = match reader.read_date_tags(path) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::warn!("Error reading EXIF data: {}", e);
            return None;
        }
    };

    for tag in DateTag::PRIORITY {
        let Some(raw) = tags.get(&tag) else {
            continue;
        };
        match parse_date(raw) {
            Ok(date) => {
                tracing::debug!("Using EXIF {}: {}", tag.as_str(), date);
                return Some((tag, date));
            }
            Err(e) => tracing::debug!("Ignoring EXIF {}: {}", tag.as_str(), e),
        }
    }

    tracing::debug!("No valid EXIF date found");
    None
}
