use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::hasher::HashAlgorithm;
use crate::media::MediaSelection;

fn default_exiftool() -> PathBuf {
    PathBuf::from("exiftool")
}

fn default_true() -> bool {
    true
}

/// Immutable settings for one organizer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Tree to ingest
    pub source: PathBuf,
    /// Base destination; a type subdirectory is appended for single-class runs
    pub base_dir: PathBuf,
    /// Metadata tool executable (bare names are looked up on PATH)
    #[serde(default = "default_exiftool")]
    pub exiftool: PathBuf,
    #[serde(default)]
    pub media: MediaSelection,
    #[serde(default)]
    pub hash: HashAlgorithm,
    /// Fall back to dates found in file and directory names
    #[serde(default = "default_true")]
    pub guess_from_names: bool,
}

impl OrganizerConfig {
    pub fn new(source: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            base_dir: base_dir.into(),
            exiftool: default_exiftool(),
            media: MediaSelection::default(),
            hash: HashAlgorithm::default(),
            guess_from_names: true,
        }
    }

    pub fn with_exiftool(mut self, exiftool: impl Into<PathBuf>) -> Self {
        self.exiftool = exiftool.into();
        self
    }

    pub fn with_media(mut self, media: MediaSelection) -> Self {
        self.media = media;
        self
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_guess(mut self, guess_from_names: bool) -> Self {
        self.guess_from_names = guess_from_names;
        self
    }

    /// Effective destination root: `<base>[/<Photo|Video>]`.
    pub fn destination(&self) -> PathBuf {
        match self.media.type_subdir() {
            Some(sub) => self.base_dir.join(sub),
            None => self.base_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_adds_type_subdir() {
        let all = OrganizerConfig::new("/in", "/out");
        assert_eq!(all.destination(), PathBuf::from("/out"));

        let photos = all.clone().with_media(MediaSelection::Photo);
        assert_eq!(photos.destination(), PathBuf::from("/out/Photo"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let cfg: OrganizerConfig =
            serde_json::from_str(r#"{"source":"/in","base_dir":"/out","media":"video"}"#).unwrap();
        assert_eq!(cfg.exiftool, PathBuf::from("exiftool"));
        assert_eq!(cfg.media, MediaSelection::Video);
        assert_eq!(cfg.hash, HashAlgorithm::Md5);
        assert!(cfg.guess_from_names);
    }
}
