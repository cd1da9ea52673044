use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for an organizer run.
///
/// Per-file failures never surface here; they are logged and the file is
/// skipped. Only conditions that stop the whole run are represented.
#[derive(Error, Debug)]
pub enum OrganizeError {
    #[error("pre-flight checks failed: {}", format_list(.0))]
    Preflight(Vec<PreflightError>),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn format_list(errors: &[PreflightError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Conditions detected before any file is touched.
#[derive(Error, Debug)]
pub enum PreflightError {
    #[error("Source directory not found: {path}")]
    SourceMissing { path: PathBuf },

    #[error("Cannot create destination directory {path}: {source}")]
    DestinationUncreatable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ExifTool not found at {path}")]
    ToolMissing { path: PathBuf },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("unparseable date '{input}'")]
    Unparseable { input: String },
}

/// Failures of the external metadata tool. All of them mean "no date from
/// metadata", never a fatal condition.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("metadata tool produced no output for {path}")]
    NoOutput { path: PathBuf },

    #[error("metadata tool output for {path} is not valid JSON: {source}")]
    InvalidOutput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum HashError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum PlacementError {
    #[error("Target file already exists: '{}'", .path.display())]
    Collision { path: PathBuf },

    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OrganizeError>;
