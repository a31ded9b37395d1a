//! Logging initialization
//!
//! Form mode: logs go to `<data dir>/regform.log`, since stderr belongs to the
//! terminal UI.
//! Headless commands: logs go to stderr.
//!
//! `RUST_LOG` overrides the default `info` level.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the data directory
pub const LOG_FILE_NAME: &str = "regform.log";

const DEFAULT_LEVEL: &str = "info";

/// Filter from `RUST_LOG`, or the default level
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Open (appending) the log file, creating the data directory if needed
pub fn open_log_file(data_dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    let path = data_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;
    Ok((file, path))
}

/// Initialize logging for the interactive form. Returns the log file path.
pub fn init_file_logging(data_dir: &Path) -> Result<PathBuf> {
    let (file, path) = open_log_file(data_dir)?;
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("Logging already initialized")?;
    Ok(path)
}

/// Initialize logging for headless commands
pub fn init_stderr_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Logging already initialized")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested").join("data");

        let (_file, path) = open_log_file(&data_dir).unwrap();
        assert_eq!(path, data_dir.join(LOG_FILE_NAME));
        assert!(path.exists());
    }

    #[test]
    fn test_open_log_file_appends() {
        use std::io::Write;

        let temp_dir = TempDir::new().unwrap();
        {
            let (mut file, _) = open_log_file(temp_dir.path()).unwrap();
            writeln!(file, "first").unwrap();
        }
        let (mut file, path) = open_log_file(temp_dir.path()).unwrap();
        writeln!(file, "second").unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }
}
