//! Taskdesk engine: HTTP client, polling loop and effect execution.
mod api;
mod artifact;
mod detail;
mod engine;
mod persist;
mod poller;
mod types;

pub use api::{ReqwestTaskApi, TaskApi, CONFIG_PATH};
pub use artifact::artifact_filename;
pub use detail::extract_error_detail;
pub use engine::{EngineCommand, EngineHandle};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use poller::{spawn_poller, PollerHandle};
pub use types::{ApiError, ArtifactError, ClientSettings, EngineEvent};
