//! Two-phase, non-blocking loading of level documents.
//!
//! [`request_level_load`] starts a background worker that fetches, parses,
//! and validates the document, then returns a [`LevelLoadHandle`]. The
//! frame loop polls the handle with [`LevelLoadHandle::poll`]; it never
//! blocks on the fetch, and the tile grid stays in its prior state until a
//! successful result is applied. There is no cancellation: a requested load
//! either completes or fails, and dropping the handle merely discards the
//! result.
use std::fs;
use std::path::PathBuf;
use std::thread;

use anyhow::Context;
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use log::debug;
use thiserror::Error;

use super::LevelData;

/// Where a level document is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelSource {
    /// A document on the local filesystem.
    File(PathBuf),
    /// A document served over HTTP(S).
    Http(String),
}

impl LevelSource {
    /// Human-readable description for logs and error events.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => format!("file {}", path.display()),
            Self::Http(url) => format!("url {url}"),
        }
    }
}

/// Failure modes of a level load, in the order they can occur.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelLoadError {
    /// The document could not be read from its source.
    #[error("failed to fetch level document ({source_desc}): {detail}")]
    Fetch {
        /// Description of the configured source.
        source_desc: String,
        /// Human-readable detail describing the I/O or network failure.
        detail: String,
    },
    /// The document is not valid JSON.
    #[error("level document is not valid JSON: {detail}")]
    Parse {
        /// Serde's description of the syntax error.
        detail: String,
    },
    /// The document is valid JSON but violates the level schema.
    #[error("level document failed schema validation: {detail}")]
    Schema {
        /// Which structural invariant was violated.
        detail: String,
    },
    /// The worker thread disappeared without reporting a result.
    #[error("level load worker disappeared without reporting a result")]
    WorkerVanished,
}

/// Result of polling an outstanding level load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPoll {
    /// The worker has not reported yet; try again next step.
    Pending,
    /// The document loaded and validated; ready to apply.
    Ready(LevelData),
    /// The load failed terminally.
    Failed(LevelLoadError),
}

/// Handle to a load requested with [`request_level_load`].
///
/// The handle is one-shot: once a terminal [`LoadPoll`] has been returned,
/// subsequent polls report [`LevelLoadError::WorkerVanished`]. Callers are
/// expected to drop the handle after a terminal result.
#[derive(Debug)]
pub struct LevelLoadHandle {
    receiver: Receiver<Result<LevelData, LevelLoadError>>,
}

impl LevelLoadHandle {
    /// Polls the outstanding load without blocking.
    #[must_use]
    pub fn poll(&self) -> LoadPoll {
        match self.receiver.try_recv() {
            Ok(Ok(data)) => LoadPoll::Ready(data),
            Ok(Err(load_error)) => LoadPoll::Failed(load_error),
            Err(TryRecvError::Empty) => LoadPoll::Pending,
            Err(TryRecvError::Disconnected) => LoadPoll::Failed(LevelLoadError::WorkerVanished),
        }
    }
}

/// Starts fetching and parsing a level document in the background.
///
/// Returns immediately; the result travels over a bounded channel and is
/// retrieved by polling the returned handle.
#[must_use]
pub fn request_level_load(source: &LevelSource) -> LevelLoadHandle {
    let (sender, receiver) = bounded(1);
    let worker_source = source.clone();
    let worker_sender = sender.clone();
    let spawned = thread::Builder::new()
        .name("level-loader".to_owned())
        .spawn(move || {
            // A dropped receiver just means nobody is polling any more.
            worker_sender.send(load_blocking(&worker_source)).ok();
        });
    if let Err(spawn_error) = spawned {
        sender
            .send(Err(LevelLoadError::Fetch {
                source_desc: source.describe(),
                detail: format!("failed to start loader thread: {spawn_error}"),
            }))
            .ok();
    }
    LevelLoadHandle { receiver }
}

/// Fetches, parses, and validates a level document, blocking the caller.
///
/// This is the worker behind [`request_level_load`]; tests and tools may
/// call it directly when blocking is acceptable.
///
/// # Errors
///
/// Returns the first of [`LevelLoadError::Fetch`], [`LevelLoadError::Parse`],
/// or [`LevelLoadError::Schema`] encountered.
pub fn load_blocking(source: &LevelSource) -> Result<LevelData, LevelLoadError> {
    let body = fetch(source).map_err(|fetch_error| LevelLoadError::Fetch {
        source_desc: source.describe(),
        detail: format!("{fetch_error:#}"),
    })?;
    // Parse in two stages so syntax errors and shape errors are reported
    // through distinct variants.
    let value: serde_json::Value =
        serde_json::from_str(&body).map_err(|parse_error| LevelLoadError::Parse {
            detail: parse_error.to_string(),
        })?;
    let data: LevelData =
        serde_json::from_value(value).map_err(|shape_error| LevelLoadError::Schema {
            detail: shape_error.to_string(),
        })?;
    data.validate()?;
    debug!(
        "Loaded level document from {}: {}x{}, {} layers",
        source.describe(),
        data.width,
        data.height,
        data.layers.len()
    );
    Ok(data)
}

fn fetch(source: &LevelSource) -> anyhow::Result<String> {
    match source {
        LevelSource::File(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        LevelSource::Http(url) => {
            let response = ureq::get(url).call().with_context(|| format!("GET {url}"))?;
            response.into_string().context("reading response body")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_level(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap_or_else(|err| {
            panic!("creating temp level file: {err}");
        });
        file.write_all(contents.as_bytes()).unwrap_or_else(|err| {
            panic!("writing temp level file: {err}");
        });
        file
    }

    #[test]
    fn missing_file_reports_fetch_failure() {
        let source = LevelSource::File("definitely/not/here.json".into());
        assert!(matches!(
            load_blocking(&source),
            Err(LevelLoadError::Fetch { .. })
        ));
    }

    #[test]
    fn invalid_json_reports_parse_failure() {
        let file = write_temp_level("{not json");
        let source = LevelSource::File(file.path().to_path_buf());
        assert!(matches!(
            load_blocking(&source),
            Err(LevelLoadError::Parse { .. })
        ));
    }

    #[test]
    fn wrong_shape_reports_schema_failure() {
        let file = write_temp_level(r#"{"width":"wide","height":1,"layers":[]}"#);
        let source = LevelSource::File(file.path().to_path_buf());
        assert!(matches!(
            load_blocking(&source),
            Err(LevelLoadError::Schema { .. })
        ));
    }

    #[test]
    fn short_layer_reports_schema_failure() {
        let file =
            write_temp_level(r#"{"width":2,"height":2,"layers":[{"name":"foreground","data":[1]}]}"#);
        let source = LevelSource::File(file.path().to_path_buf());
        assert!(matches!(
            load_blocking(&source),
            Err(LevelLoadError::Schema { .. })
        ));
    }

    #[test]
    fn valid_document_loads() {
        let file = write_temp_level(
            r#"{"width":2,"height":1,"layers":[{"name":"foreground","data":[10,3]}]}"#,
        );
        let source = LevelSource::File(file.path().to_path_buf());
        let data = load_blocking(&source).unwrap_or_else(|err| {
            panic!("valid level should load: {err}");
        });
        assert_eq!(data.width, 2);
        assert_eq!(data.height, 1);
        assert_eq!(data.layers.len(), 1);
    }

    #[test]
    fn handle_polls_pending_then_ready() {
        let file = write_temp_level(r#"{"width":1,"height":1,"layers":[]}"#);
        let handle = request_level_load(&LevelSource::File(file.path().to_path_buf()));
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        loop {
            match handle.poll() {
                LoadPoll::Pending => {
                    assert!(std::time::Instant::now() < deadline, "load timed out");
                    std::thread::sleep(std::time::Duration::from_millis(5));
                }
                LoadPoll::Ready(data) => {
                    assert_eq!(data.width, 1);
                    break;
                }
                LoadPoll::Failed(load_error) => panic!("unexpected failure: {load_error}"),
            }
        }
        // The handle is one-shot.
        assert_eq!(
            handle.poll(),
            LoadPoll::Failed(LevelLoadError::WorkerVanished)
        );
    }
}
