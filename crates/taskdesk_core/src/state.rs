use crate::view_model::SessionView;
use crate::{JobKind, ServiceConfig, TaskHandle, TaskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing notification (validation failure, submission error). The
/// front-end decides how blocking to make it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Client-observed session lifecycle. The server is authoritative for the
/// task itself; this tracks only what this client has seen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting {
        kind: JobKind,
    },
    Polling {
        kind: JobKind,
        task: TaskHandle,
        progress: u8,
        message: String,
        details: Vec<String>,
        stream_log: String,
    },
    Completed {
        result: Option<TaskResult>,
    },
    /// Terminal failure. Deliberately sticky: the error text and diagnostic
    /// log stay on screen until an explicit reset, never clobbered by an
    /// automatic return to `Idle`.
    Failed {
        error: String,
        stream_log: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    phase: Phase,
    config: ServiceConfig,
    notice: Option<Notice>,
    last_seq: u64,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            config: ServiceConfig::fallback(),
            notice: None,
            last_seq: 0,
            dirty: false,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn view(&self) -> SessionView {
        SessionView::project(self)
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.dirty = true;
    }

    pub(crate) fn set_config(&mut self, config: ServiceConfig) {
        self.config = config;
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.dirty = true;
    }

    pub(crate) fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.dirty = true;
        }
    }

    /// Highest poll sequence number applied so far for the current task.
    pub(crate) fn last_seq(&self) -> u64 {
        self.last_seq
    }

    pub(crate) fn set_last_seq(&mut self, seq: u64) {
        self.last_seq = seq;
    }

    pub(crate) fn reset_seq(&mut self) {
        self.last_seq = 0;
    }
}
