use crate::{JobKind, JobRequest, TaskHandle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the language/model catalogue from the config endpoint.
    FetchConfig,
    /// Submit a validated job. Exactly one attempt; retry is user-initiated.
    SubmitJob { request: JobRequest },
    /// Begin polling the status endpoint for an accepted task. The engine
    /// cancels any previous poll loop first, so at most one is ever live.
    StartPolling { kind: JobKind, task: TaskHandle },
    /// Cancel the active poll loop, if any. Safe to issue when none is live.
    StopPolling,
    /// Download result artifacts by their server-relative paths.
    DownloadArtifacts { paths: Vec<String> },
}
