use std::sync::Once;

use taskdesk_core::{
    update, AlignmentOptions, AppState, Effect, JobFile, JobKind, JobRequest, Msg, PhaseView,
    StatusSnapshot, SubmitOutcome, TaskHandle, TaskState,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn assert_zeroed(state: &AppState) {
    let view = state.view();
    assert_eq!(view.phase, PhaseView::Idle);
    assert_eq!(view.progress, 0);
    assert!(view.message.is_empty());
    assert!(view.details.is_empty());
    assert!(view.stream_log.is_empty());
    assert!(view.summary.is_empty());
    assert!(view.artifacts.is_empty());
    assert!(view.error.is_none());
}

#[test]
fn reset_when_idle_is_idempotent() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::ResetRequested);
    // Cancelling a poll loop that never existed is harmless.
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_zeroed(&state);

    let (state, effects) = update(state, Msg::ResetRequested);
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_zeroed(&state);
}

#[test]
fn reset_mid_poll_cancels_and_zeroes() {
    init_logging();
    let request = JobRequest::new(
        JobKind::Alignment(AlignmentOptions::default()),
        vec![
            JobFile::new("original_file", "/tmp/original.docx"),
            JobFile::new("translated_file", "/tmp/translated.docx"),
        ],
    );
    let state = AppState::new();
    let (state, _) = update(state, Msg::SubmitRequested(request));
    let (state, _) = update(
        state,
        Msg::SubmitFinished(SubmitOutcome::Accepted(TaskHandle::new("task-1"))),
    );
    let (state, _) = update(
        state,
        Msg::StatusArrived {
            seq: 1,
            snapshot: StatusSnapshot {
                status: TaskState::Running,
                progress: 55,
                message: "halfway".to_string(),
                details: vec!["chunk 2/4".to_string()],
                result: None,
                error: None,
                stream_log: Some("...".to_string()),
            },
        },
    );
    assert_eq!(state.view().progress, 55);

    let (state, effects) = update(state, Msg::ResetRequested);
    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_zeroed(&state);
}

#[test]
fn reset_clears_failure_diagnostics() {
    init_logging();
    let request = JobRequest::new(
        JobKind::Alignment(AlignmentOptions::default()),
        vec![
            JobFile::new("original_file", "/tmp/original.docx"),
            JobFile::new("translated_file", "/tmp/translated.docx"),
        ],
    );
    let state = AppState::new();
    let (state, _) = update(state, Msg::SubmitRequested(request));
    let (state, _) = update(
        state,
        Msg::SubmitFinished(SubmitOutcome::Accepted(TaskHandle::new("task-1"))),
    );
    let (state, _) = update(
        state,
        Msg::StatusArrived {
            seq: 1,
            snapshot: StatusSnapshot {
                status: TaskState::Failed,
                progress: 0,
                message: String::new(),
                details: Vec::new(),
                result: None,
                error: Some("boom".to_string()),
                stream_log: Some("trace".to_string()),
            },
        },
    );
    assert_eq!(state.view().phase, PhaseView::Failed);

    let (state, _) = update(state, Msg::ResetRequested);
    assert_zeroed(&state);
}
