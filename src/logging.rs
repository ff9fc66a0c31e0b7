use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "input-tui.log";

/// `<data dir>/input-tui/input-tui.log`, or the working directory when the
/// platform has no data directory.
pub fn default_log_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("input-tui"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("Failed to open log file {}", path.display()))
}

/// Install the global subscriber. The terminal belongs to the UI, so
/// events go to a file instead of stderr. `RUST_LOG` overrides the
/// default `info` level.
pub fn init(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_log_path);
    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to install log subscriber: {e}"))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path() {
        let path = default_log_path();
        assert!(path.ends_with("input-tui/input-tui.log") || path.ends_with(LOG_FILE_NAME));
    }

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("run.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }
}
