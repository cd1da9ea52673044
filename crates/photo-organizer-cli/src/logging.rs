use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Local};
use photo_organizer_core::MediaSelection;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// `<All|Photo|Video>_YYYY-MM-DD_HH-MM-SS.log`
pub fn log_file_name(media: MediaSelection, started: &DateTime<Local>) -> String {
    format!("{}_{}", media.label(), started.format("%Y-%m-%d_%H-%M-%S.log"))
}

/// Console on stderr (`RUST_LOG`, else info/debug), plus an optional plain-text
/// file receiving everything down to debug.
///
/// A log file that cannot be created is reported and the run continues with
/// console output only.
pub fn init(verbose: bool, log_file: Option<&Path>) {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let console = fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(console_filter);

    let file_layer = log_file.and_then(|path| match open_log_file(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_filter(LevelFilter::DEBUG),
        ),
        Err(e) => {
            eprintln!("Error writing file '{}': {}", path.display(), e);
            None
        }
    });

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    if let Some(path) = log_file {
        tracing::debug!("Photo Organizer Log: {}", path.display());
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}
