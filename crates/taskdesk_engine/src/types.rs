use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use taskdesk_core::{ServiceConfig, StatusSnapshot, SubmitOutcome};

use crate::persist::PersistError;

/// Connection and pacing settings for the backend client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Delay between status polls for an accepted task.
    pub poll_interval: Duration,
    pub max_artifact_bytes: u64,
    pub output_dir: PathBuf,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:8000/").expect("static url"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(1200),
            max_artifact_bytes: 200 * 1024 * 1024,
            output_dir: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    /// Non-OK HTTP response; `detail` already carries the extracted
    /// server-side explanation.
    #[error("{detail}")]
    Status { code: u16, detail: String },
    #[error("malformed response body: {0}")]
    InvalidBody(String),
    #[error("cannot read input file {path}: {message}")]
    InputFile { path: PathBuf, message: String },
    #[error("artifact too large (limit {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
    #[error("unsafe artifact path: {0}")]
    UnsafePath(String),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Everything the engine reports back to the session loop.
#[derive(Debug)]
pub enum EngineEvent {
    ConfigLoaded {
        result: Result<ServiceConfig, ApiError>,
    },
    SubmitFinished {
        result: Result<SubmitOutcome, ApiError>,
    },
    /// One status snapshot, tagged with the monotonic tick that requested
    /// it. The poller only forwards snapshots in increasing `seq` order.
    Status { seq: u64, snapshot: StatusSnapshot },
    ArtifactSaved {
        relative_path: String,
        result: Result<PathBuf, ArtifactError>,
    },
}
