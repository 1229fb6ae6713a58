use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;

use taskdesk_core::{
    AlignmentOptions, JobKind, JobRequest, ServiceConfig, StatusSnapshot, SubmitOutcome,
    TaskHandle, TaskState,
};
use taskdesk_engine::{ApiError, ClientSettings, EngineEvent, EngineHandle, TaskApi};

/// Scripted backend: counts status polls per task id and reports `done`
/// only for task ids listed as finishing.
#[derive(Default)]
struct ScriptedApi {
    poll_counts: Mutex<HashMap<String, u64>>,
    finishing: Vec<String>,
}

impl ScriptedApi {
    fn finishing(ids: &[&str]) -> Self {
        Self {
            poll_counts: Mutex::new(HashMap::new()),
            finishing: ids.iter().map(|id| id.to_string()).collect(),
        }
    }

    fn polls_for(&self, id: &str) -> u64 {
        *self.poll_counts.lock().unwrap().get(id).unwrap_or(&0)
    }
}

#[async_trait::async_trait]
impl TaskApi for ScriptedApi {
    async fn fetch_config(&self) -> Result<ServiceConfig, ApiError> {
        Ok(ServiceConfig::fallback())
    }

    async fn submit(&self, _request: &JobRequest) -> Result<SubmitOutcome, ApiError> {
        Ok(SubmitOutcome::Accepted(TaskHandle::new("scripted")))
    }

    async fn poll_status(
        &self,
        _kind: &JobKind,
        task: &TaskHandle,
    ) -> Result<StatusSnapshot, ApiError> {
        *self
            .poll_counts
            .lock()
            .unwrap()
            .entry(task.id.clone())
            .or_insert(0) += 1;
        let status = if self.finishing.iter().any(|id| *id == task.id) {
            TaskState::Done
        } else {
            TaskState::Running
        };
        Ok(StatusSnapshot {
            status,
            progress: 50,
            message: String::new(),
            details: Vec::new(),
            result: None,
            error: None,
            stream_log: None,
        })
    }

    async fn fetch_artifact(&self, _relative_path: &str) -> Result<Vec<u8>, ApiError> {
        Err(ApiError::Network("not scripted".into()))
    }
}

fn fast_settings() -> ClientSettings {
    ClientSettings {
        poll_interval: Duration::from_millis(20),
        ..ClientSettings::default()
    }
}

fn alignment() -> JobKind {
    JobKind::Alignment(AlignmentOptions::default())
}

fn wait_for<F: FnMut() -> bool>(mut condition: F) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "condition never met");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn starting_a_new_poll_cancels_the_previous_one() {
    let api = Arc::new(ScriptedApi::finishing(&["task-new"]));
    let engine = EngineHandle::with_api(api.clone(), fast_settings());

    engine.start_polling(alignment(), TaskHandle::new("task-old"));
    wait_for(|| api.polls_for("task-old") >= 2);

    engine.start_polling(alignment(), TaskHandle::new("task-new"));
    wait_for(|| api.polls_for("task-new") >= 1);

    // The old loop was aborted when the new one started; its count is
    // frozen from here on.
    let frozen = api.polls_for("task-old");
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(api.polls_for("task-old"), frozen);
}

#[test]
fn stop_polling_halts_the_active_loop() {
    let api = Arc::new(ScriptedApi::finishing(&[]));
    let engine = EngineHandle::with_api(api.clone(), fast_settings());

    engine.start_polling(alignment(), TaskHandle::new("task-1"));
    wait_for(|| api.polls_for("task-1") >= 2);
    engine.stop_polling();

    std::thread::sleep(Duration::from_millis(100));
    let frozen = api.polls_for("task-1");
    std::thread::sleep(Duration::from_millis(200));
    assert_eq!(api.polls_for("task-1"), frozen);
}

#[test]
fn submit_and_config_round_trip_through_the_event_channel() {
    let api = Arc::new(ScriptedApi::finishing(&[]));
    let engine = EngineHandle::with_api(api, fast_settings());

    engine.fetch_config();
    engine.submit(JobRequest::new(alignment(), Vec::new()));

    let mut config_seen = false;
    let mut submit_seen = false;
    let deadline = Instant::now() + Duration::from_secs(5);
    while !(config_seen && submit_seen) {
        assert!(Instant::now() < deadline, "events never arrived");
        match engine.try_recv() {
            Some(EngineEvent::ConfigLoaded { result }) => {
                assert!(result.is_ok());
                config_seen = true;
            }
            Some(EngineEvent::SubmitFinished { result }) => {
                match result.expect("submit ok") {
                    SubmitOutcome::Accepted(handle) => assert_eq!(handle.id, "scripted"),
                    other => panic!("unexpected outcome {other:?}"),
                }
                submit_seen = true;
            }
            _ => std::thread::sleep(Duration::from_millis(10)),
        }
    }
}
