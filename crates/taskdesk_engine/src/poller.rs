use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use client_logging::{client_debug, client_warn};
use tokio::sync::mpsc as tokio_mpsc;
use tokio::time::MissedTickBehavior;

use taskdesk_core::{JobKind, StatusSnapshot, TaskHandle};

use crate::api::TaskApi;
use crate::types::{ApiError, EngineEvent};

/// Owner handle for one running poll loop. Dropping the handle leaves the
/// loop running; call [`PollerHandle::stop`] to cancel it.
pub struct PollerHandle {
    join: tokio::task::JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(self) {
        self.join.abort();
    }
}

/// Start polling the status endpoint for one accepted task.
///
/// Each interval tick issues an independent status request tagged with the
/// next sequence number. Responses are forwarded in strictly increasing
/// `seq` order; a slow request that resolves after a newer one is dropped
/// here rather than shipped to the session. The loop exits on its own after
/// forwarding the first terminal snapshot, and runs for as long as the task
/// does otherwise.
pub fn spawn_poller(
    handle: &tokio::runtime::Handle,
    api: Arc<dyn TaskApi>,
    kind: JobKind,
    task: TaskHandle,
    interval: Duration,
    event_tx: mpsc::Sender<EngineEvent>,
) -> PollerHandle {
    let join = handle.spawn(async move {
        let (result_tx, mut result_rx) =
            tokio_mpsc::unbounded_channel::<(u64, Result<StatusSnapshot, ApiError>)>();
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut issued: u64 = 0;
        let mut delivered: u64 = 0;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    issued += 1;
                    let seq = issued;
                    let api = api.clone();
                    let kind = kind.clone();
                    let task = task.clone();
                    let result_tx = result_tx.clone();
                    tokio::spawn(async move {
                        client_logging::set_poll_tick(seq);
                        let result = api.poll_status(&kind, &task).await;
                        let _ = result_tx.send((seq, result));
                    });
                }
                Some((seq, result)) = result_rx.recv() => {
                    match result {
                        Err(err) => {
                            // Transient by assumption: the task keeps running
                            // server-side, so the next tick retries.
                            client_warn!(
                                "status poll {seq} for task {} failed: {err}",
                                task.id
                            );
                        }
                        Ok(snapshot) => {
                            if seq <= delivered {
                                client_debug!(
                                    "dropping stale status response {seq} (newest {delivered})"
                                );
                                continue;
                            }
                            delivered = seq;
                            let terminal = snapshot.status.is_terminal();
                            let _ = event_tx.send(EngineEvent::Status { seq, snapshot });
                            if terminal {
                                break;
                            }
                        }
                    }
                }
            }
        }
    });
    PollerHandle { join }
}
