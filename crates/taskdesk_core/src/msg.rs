use crate::{JobRequest, ServiceConfig, StatusSnapshot, SubmitOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// App startup; triggers the config fetch.
    Started,
    /// Config endpoint answered.
    ConfigLoaded(ServiceConfig),
    /// Config fetch failed; the built-in fallback stays in effect.
    ConfigFailed { message: String },
    /// User asked to submit a job. Validation runs before any effect.
    SubmitRequested(JobRequest),
    /// Submission round-trip finished with a parseable response.
    SubmitFinished(SubmitOutcome),
    /// Submission failed (transport error, non-OK status, malformed body).
    SubmitFailed { message: String },
    /// A status poll response arrived, tagged with its request sequence.
    StatusArrived { seq: u64, snapshot: StatusSnapshot },
    /// User asked to reset back to the upload state.
    ResetRequested,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
