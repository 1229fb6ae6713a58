//! Taskdesk core: pure session state machine and view-model helpers.
mod config;
mod effect;
mod job;
mod links;
mod msg;
mod snapshot;
mod state;
mod update;
mod view_model;

pub use config::{ModelInfo, ServiceConfig};
pub use effect::Effect;
pub use job::{
    AlignmentOptions, CardSide, DocumentKind, ImageTranslationOptions, JobFile, JobKind,
    JobRequest, PageTemplate, SplitThresholds, ValidationError,
};
pub use links::{artifact_url, is_safe_relative_path};
pub use msg::Msg;
pub use snapshot::{
    AlignmentResult, CheckReports, CheckStats, ImageArtifacts, ImageTranslationResult,
    NumberCheckResult, StatusSnapshot, SubmitOutcome, SubmitParseError, TaskHandle, TaskResult,
    TaskState,
};
pub use state::{AppState, Notice, NoticeLevel, Phase};
pub use update::update;
pub use view_model::{PhaseView, SessionView};
