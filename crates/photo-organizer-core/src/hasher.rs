use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::HashError;

const CHUNK_SIZE: usize = 8192;

/// Content fingerprint algorithm used for deduplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
}

/// Hex digest of a file's content, streamed in fixed-size chunks.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<String, HashError> {
    let io_err = |source| HashError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    match algorithm {
        HashAlgorithm::Md5 => digest_reader::<Md5, _>(file),
        HashAlgorithm::Sha256 => digest_reader::<Sha256, _>(file),
    }
    .map_err(io_err)
}

fn digest_reader<D: Digest, R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = D::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Fingerprints already known to a run. Grows monotonically.
#[derive(Debug, Clone, Default)]
pub struct DedupIndex {
    hashes: HashSet<String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fingerprint. Returns `false` if it was already present.
    pub fn insert(&mut self, hash: String) -> bool {
        self.hashes.insert(hash)
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.hashes.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn known_digests() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abc.jpg");
        fs::write(&path, b"abc").unwrap();

        assert_eq!(
            hash_file(&path, HashAlgorithm::Md5).unwrap(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert_eq!(
            hash_file(&path, HashAlgorithm::Sha256).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn content_only_not_name() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("nested_b.png");
        let content = vec![7u8; CHUNK_SIZE * 3 + 17];
        fs::write(&a, &content).unwrap();
        fs::write(&b, &content).unwrap();

        assert_eq!(
            hash_file(&a, HashAlgorithm::Md5).unwrap(),
            hash_file(&b, HashAlgorithm::Md5).unwrap()
        );
    }

    #[test]
    fn unreadable_file_is_error() {
        let dir = tempdir().unwrap();
        let err = hash_file(&dir.path().join("missing.jpg"), HashAlgorithm::Md5).unwrap_err();
        assert!(err.to_string().contains("missing.jpg"));
    }

    #[test]
    fn index_insert_reports_duplicates() {
        let mut index = DedupIndex::new();
        assert!(index.insert("abc".into()));
        assert!(!index.insert("abc".into()));
        assert!(index.contains("abc"));
        assert_eq!(index.len(), 1);
    }
}
