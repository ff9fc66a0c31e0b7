use std::path::{Path, PathBuf};

use alloy::primitives::Bytes;
use alloy::transports::http::reqwest::Url;
use tokio::sync::mpsc;

use crate::events::AppEvent;

#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Please drop a single JSON file.")]
    MultipleFiles,
    #[error("Only .json files are accepted.")]
    NotJsonFile,
    #[error("File reading has failed: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid JSON file. Please upload a valid JSON.")]
    InvalidJson,
}

/// Turn dropped/pasted text into a single file path.
///
/// Terminals paste dragged files as shell-quoted paths, one per line or space separated.
pub fn parse_drop(text: &str) -> Result<PathBuf, InputError> {
    let paths = split_paths(text.trim());
    match paths.as_slice() {
        [single] => {
            let path = file_url_path(single).unwrap_or_else(|| PathBuf::from(single));
            check_json_path(&path)?;
            Ok(path)
        }
        [] => Err(InputError::NotJsonFile),
        _ => Err(InputError::MultipleFiles),
    }
}

fn split_paths(text: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => quote = Some(c),
            (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    paths.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(current);
    }
    paths
}

/// Decode a `file://` URL (percent escapes included) into a local path.
fn file_url_path(text: &str) -> Option<PathBuf> {
    if !text.starts_with("file://") {
        return None;
    }
    Url::parse(text).ok()?.to_file_path().ok()
}

/// Accept only paths with a `.json` extension, in any case.
pub fn check_json_path(path: &Path) -> Result<(), InputError> {
    if has_json_extension(path) {
        Ok(())
    } else {
        Err(InputError::NotJsonFile)
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Check that `text` is well-formed JSON. The parsed value is discarded.
pub fn validate_json(text: &str) -> Result<(), InputError> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(|_| ())
        .map_err(|_| InputError::InvalidJson)
}

/// Read a file as UTF-8 text and validate it as JSON, returning the raw text.
pub async fn read_json_file(path: &Path) -> Result<String, InputError> {
    let text = tokio::fs::read_to_string(path).await?;
    validate_json(&text)?;
    Ok(text)
}

/// Read `path` in the background and post the outcome tagged with `seq`.
pub fn spawn_read(path: PathBuf, seq: u64, event_tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let result = read_json_file(&path).await;
        match &result {
            Ok(text) => tracing::info!(path = %path.display(), bytes = text.len(), "loaded input file"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "rejected input file"),
        }
        let _ = event_tx.send(AppEvent::FileRead { seq, result });
    });
}

pub fn encode_payload(text: &str) -> Bytes {
    Bytes::copy_from_slice(text.as_bytes())
}
