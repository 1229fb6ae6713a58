use crate::{
    AppState, Effect, Msg, Notice, Phase, StatusSnapshot, SubmitOutcome, TaskResult, TaskState,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => vec![Effect::FetchConfig],
        Msg::ConfigLoaded(config) => {
            state.set_config(config);
            Vec::new()
        }
        Msg::ConfigFailed { .. } => {
            // The fallback catalogue installed at construction stays in
            // effect; the session remains fully usable.
            state.mark_dirty();
            Vec::new()
        }
        Msg::SubmitRequested(request) => {
            if !matches!(state.phase(), Phase::Idle) {
                return (state, Vec::new());
            }
            if let Err(err) = request.validate() {
                // Validation failures never reach the network.
                state.set_notice(Notice::error(err.to_string()));
                return (state, Vec::new());
            }
            state.clear_notice();
            state.set_phase(Phase::Submitting {
                kind: request.kind.clone(),
            });
            vec![Effect::SubmitJob { request }]
        }
        Msg::SubmitFinished(outcome) => {
            let Phase::Submitting { kind } = state.phase().clone() else {
                return (state, Vec::new());
            };
            match outcome {
                SubmitOutcome::Accepted(task) => {
                    state.reset_seq();
                    state.set_phase(Phase::Polling {
                        kind: kind.clone(),
                        task: task.clone(),
                        progress: 5,
                        message: "task submitted, waiting for worker".to_string(),
                        details: Vec::new(),
                        stream_log: String::new(),
                    });
                    vec![Effect::StartPolling { kind, task }]
                }
                SubmitOutcome::Immediate(result) => complete(&mut state, Some(result)),
            }
        }
        Msg::SubmitFailed { message } => {
            if !matches!(state.phase(), Phase::Submitting { .. }) {
                return (state, Vec::new());
            }
            state.set_notice(Notice::error(message));
            state.set_phase(Phase::Idle);
            Vec::new()
        }
        Msg::StatusArrived { seq, snapshot } => {
            if !matches!(state.phase(), Phase::Polling { .. }) {
                // A response that raced a reset or terminal tick; the task
                // handle is gone, so there is nothing to apply it to.
                return (state, Vec::new());
            }
            if seq <= state.last_seq() {
                // Stale response from an earlier tick; never let it
                // overwrite fresher state.
                return (state, Vec::new());
            }
            state.set_last_seq(seq);
            apply_snapshot(&mut state, snapshot)
        }
        Msg::ResetRequested => {
            state.clear_notice();
            state.reset_seq();
            state.set_phase(Phase::Idle);
            // A reset mid-poll must cancel the live timer; after a
            // terminal snapshot this is a no-op.
            vec![Effect::StopPolling]
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_snapshot(state: &mut AppState, snapshot: StatusSnapshot) -> Vec<Effect> {
    match snapshot.status {
        TaskState::Done => {
            let mut effects = vec![Effect::StopPolling];
            effects.extend(complete(state, snapshot.result));
            effects
        }
        TaskState::Failed => {
            let stream_log = latest_stream_log(state, snapshot.stream_log);
            state.set_phase(Phase::Failed {
                error: snapshot
                    .error
                    .unwrap_or_else(|| "unknown error".to_string()),
                stream_log,
            });
            vec![Effect::StopPolling]
        }
        // `pending`, `running` and anything unrecognized keep the poll
        // loop going; only a parsed terminal status stops it.
        TaskState::Pending | TaskState::Running | TaskState::Unknown => {
            let stream_log = latest_stream_log(state, snapshot.stream_log);
            let Phase::Polling { kind, task, .. } = state.phase().clone() else {
                return Vec::new();
            };
            state.set_phase(Phase::Polling {
                kind,
                task,
                progress: snapshot.progress.min(100),
                message: snapshot.message,
                details: snapshot.details,
                stream_log,
            });
            Vec::new()
        }
    }
}

/// The diagnostic log is replaced wholesale each tick when present; a
/// snapshot without one keeps whatever was shown before.
fn latest_stream_log(state: &AppState, incoming: Option<String>) -> String {
    match incoming {
        Some(log) => log,
        None => match state.phase() {
            Phase::Polling { stream_log, .. } => stream_log.clone(),
            _ => String::new(),
        },
    }
}

fn complete(state: &mut AppState, result: Option<TaskResult>) -> Vec<Effect> {
    let paths = result
        .as_ref()
        .map(TaskResult::artifact_paths)
        .unwrap_or_default();
    state.set_phase(Phase::Completed { result });
    if paths.is_empty() {
        Vec::new()
    } else {
        vec![Effect::DownloadArtifacts { paths }]
    }
}
