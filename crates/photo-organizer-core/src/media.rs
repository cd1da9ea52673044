use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::date::DateResult;

const PHOTO_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "tif", "tiff", "raw", "cr2", "nef", "heic", "nrw",
];

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "3gp", "mov", "avi"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    /// Classify by extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Photo)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// Which media classes a run handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSelection {
    #[default]
    All,
    Photo,
    Video,
}

impl MediaSelection {
    pub fn accepts(self, kind: MediaKind) -> bool {
        match self {
            Self::All => true,
            Self::Photo => kind == MediaKind::Photo,
            Self::Video => kind == MediaKind::Video,
        }
    }

    /// Supported-extension check for a path.
    pub fn matches(self, path: &Path) -> bool {
        lowercase_extension(path)
            .and_then(|ext| MediaKind::from_extension(&ext))
            .is_some_and(|kind| self.accepts(kind))
    }

    /// Subdirectory under the base destination; only single-class runs get one.
    pub fn type_subdir(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Photo => Some("Photo"),
            Self::Video => Some("Video"),
        }
    }

    /// Label used as the log file prefix.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Photo => "Photo",
            Self::Video => "Video",
        }
    }
}

pub fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// A supported file discovered in the source tree.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Absolute source path
    pub path: PathBuf,
    /// Lowercase extension without the dot
    pub extension: String,
    /// Content digest hex (None until hashed)
    pub hash: Option<String>,
    /// Resolved date (None until resolved, or unresolvable)
    pub date: Option<DateResult>,
}

impl MediaFile {
    pub fn new(path: PathBuf) -> Option<Self> {
        let extension = lowercase_extension(&path)?;
        Some(Self {
            path,
            extension,
            hash: None,
            date: None,
        })
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
    }

    /// Name of the immediate parent directory, if any.
    pub fn parent_name(&self) -> Option<&str> {
        self.path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
    }
}
