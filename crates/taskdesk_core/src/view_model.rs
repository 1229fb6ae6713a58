use crate::{AppState, Notice, Phase, ServiceConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseView {
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

/// Render-ready projection of the session state. Built fresh on demand;
/// holds no references back into [`AppState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub phase: PhaseView,
    /// Clamped to 0..=100. Terminal phases pin it to the endpoint value.
    pub progress: u8,
    pub message: String,
    pub details: Vec<String>,
    pub stream_log: String,
    pub notice: Option<Notice>,
    pub summary: Vec<(String, String)>,
    pub issues: Vec<String>,
    /// Server-relative artifact paths from the final result.
    pub artifacts: Vec<String>,
    pub error: Option<String>,
    pub dirty: bool,
}

impl SessionView {
    pub(crate) fn project(state: &AppState) -> Self {
        let mut view = Self {
            phase: PhaseView::Idle,
            progress: 0,
            message: String::new(),
            details: Vec::new(),
            stream_log: String::new(),
            notice: state.notice().cloned(),
            summary: Vec::new(),
            issues: Vec::new(),
            artifacts: Vec::new(),
            error: None,
            dirty: state.is_dirty(),
        };

        match state.phase() {
            Phase::Idle => {}
            Phase::Submitting { kind } => {
                view.phase = PhaseView::Submitting;
                view.message = format!("submitting {} job...", kind.label());
            }
            Phase::Polling {
                progress,
                message,
                details,
                stream_log,
                ..
            } => {
                view.phase = PhaseView::Polling;
                view.progress = (*progress).min(100);
                view.message = message.clone();
                view.details = details.clone();
                view.stream_log = stream_log.clone();
            }
            Phase::Completed { result } => {
                view.phase = PhaseView::Completed;
                view.progress = 100;
                view.message = "processing complete".to_string();
                if let Some(result) = result {
                    view.summary = result.summary_rows();
                    view.issues = result.issues().to_vec();
                    view.artifacts = result.artifact_paths();
                }
            }
            Phase::Failed { error, stream_log } => {
                view.phase = PhaseView::Failed;
                view.error = Some(error.clone());
                view.stream_log = stream_log.clone();
            }
        }

        view
    }

    /// Language names for selection UIs, from the loaded config or the
    /// fallback catalogue.
    pub fn language_names(config: &ServiceConfig) -> Vec<&str> {
        config.languages.keys().map(String::as_str).collect()
    }

    /// Model names for selection UIs.
    pub fn model_names(config: &ServiceConfig) -> Vec<&str> {
        config.models.keys().map(String::as_str).collect()
    }
}
