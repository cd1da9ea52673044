use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OrganizerConfig;
use crate::error::PreflightError;

/// Validate paths before any processing. Creates the destination if missing.
///
/// Every problem is collected so the caller can report them together.
pub fn verify_paths(config: &OrganizerConfig) -> Result<(), Vec<PreflightError>> {
    let mut errors = Vec::new();

    let dest = config.destination();
    tracing::info!("Checking destination directory: {}", dest.display());
    if dest.is_dir() {
        tracing::info!("Destination directory exists");
    } else {
        match fs::create_dir_all(&dest) {
            Ok(()) => tracing::info!("Created destination directory"),
            Err(source) => errors.push(PreflightError::DestinationUncreatable { path: dest, source }),
        }
    }

    tracing::info!("Checking ExifTool at: {}", config.exiftool.display());
    match locate_tool(&config.exiftool) {
        Some(found) => tracing::info!("ExifTool found successfully: {}", found.display()),
        None => errors.push(PreflightError::ToolMissing {
            path: config.exiftool.clone(),
        }),
    }

    tracing::info!("Checking source directory: {}", config.source.display());
    if config.source.is_dir() {
        tracing::info!("Source directory found successfully");
    } else {
        errors.push(PreflightError::SourceMissing {
            path: config.source.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Resolve the tool path. A bare program name is searched on `PATH`.
pub fn locate_tool(tool: &Path) -> Option<PathBuf> {
    if tool.components().count() > 1 || tool.is_absolute() {
        return tool.is_file().then(|| tool.to_path_buf());
    }

    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var).find_map(|dir| {
        let candidate = dir.join(tool);
        if candidate.is_file() {
            return Some(candidate);
        }
        if cfg!(windows) && tool.extension().is_none() {
            let exe = candidate.with_extension("exe");
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reports_all_errors_at_once() {
        let dir = tempdir().unwrap();
        let config = OrganizerConfig::new(dir.path().join("no-such-source"), dir.path().join("out"))
            .with_exiftool(dir.path().join("bin/exiftool"));

        let errors = verify_paths(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], PreflightError::ToolMissing { .. }));
        assert!(matches!(errors[1], PreflightError::SourceMissing { .. }));
        // The destination was creatable, so it now exists.
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn passes_with_existing_paths() {
        let dir = tempdir().unwrap();
        let tool = dir.path().join("exiftool");
        fs::write(&tool, b"").unwrap();
        fs::create_dir(dir.path().join("in")).unwrap();

        let config = OrganizerConfig::new(dir.path().join("in"), dir.path().join("out"))
            .with_media(crate::media::MediaSelection::Photo)
            .with_exiftool(&tool);
        assert!(verify_paths(&config).is_ok());
        assert!(dir.path().join("out/Photo").is_dir());
    }

    #[test]
    fn uncreatable_destination() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let config = OrganizerConfig::new(dir.path(), blocker.join("out"))
            .with_exiftool(dir.path().join("missing-tool"));
        let errors = verify_paths(&config).unwrap_err();
        assert!(matches!(errors[0], PreflightError::DestinationUncreatable { .. }));
    }

    #[test]
    fn explicit_tool_path_must_exist() {
        let dir = tempdir().unwrap();
        assert!(locate_tool(&dir.path().join("exiftool")).is_none());
        let tool = dir.path().join("exiftool");
        fs::write(&tool, b"").unwrap();
        assert_eq!(locate_tool(&tool), Some(tool));
    }
}
