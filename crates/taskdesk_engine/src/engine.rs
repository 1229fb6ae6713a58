use std::sync::{mpsc, Arc};
use std::thread;

use client_logging::client_info;

use taskdesk_core::{JobKind, JobRequest, TaskHandle};

use crate::api::{ReqwestTaskApi, TaskApi};
use crate::artifact::artifact_filename;
use crate::persist::AtomicFileWriter;
use crate::poller::{spawn_poller, PollerHandle};
use crate::types::{ApiError, ArtifactError, ClientSettings, EngineEvent};

pub enum EngineCommand {
    FetchConfig,
    Submit { request: JobRequest },
    StartPolling { kind: JobKind, task: TaskHandle },
    StopPolling,
    DownloadArtifacts { paths: Vec<String> },
}

/// Session-side handle to the IO thread. Commands go in over one channel,
/// events come back over another; the session loop drains events with
/// [`EngineHandle::try_recv`] between renders.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let api = Arc::new(ReqwestTaskApi::new(settings.clone())?);
        Ok(Self::with_api(api, settings))
    }

    /// Build an engine over an arbitrary [`TaskApi`]; tests use this to
    /// substitute a scripted backend.
    pub fn with_api(api: Arc<dyn TaskApi>, settings: ClientSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            // At most one poll loop exists at a time; starting a new one
            // cancels the previous loop first.
            let mut poller: Option<PollerHandle> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::FetchConfig => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.fetch_config().await;
                            let _ = event_tx.send(EngineEvent::ConfigLoaded { result });
                        });
                    }
                    EngineCommand::Submit { request } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.submit(&request).await;
                            let _ = event_tx.send(EngineEvent::SubmitFinished { result });
                        });
                    }
                    EngineCommand::StartPolling { kind, task } => {
                        if let Some(previous) = poller.take() {
                            previous.stop();
                        }
                        client_info!("polling task {} ({})", task.id, kind.label());
                        poller = Some(spawn_poller(
                            runtime.handle(),
                            api.clone(),
                            kind,
                            task,
                            settings.poll_interval,
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::StopPolling => {
                        if let Some(previous) = poller.take() {
                            previous.stop();
                        }
                    }
                    EngineCommand::DownloadArtifacts { paths } => {
                        for relative_path in paths {
                            let api = api.clone();
                            let event_tx = event_tx.clone();
                            let output_dir = settings.output_dir.clone();
                            runtime.spawn(async move {
                                let result = download_artifact(
                                    api.as_ref(),
                                    &relative_path,
                                    AtomicFileWriter::new(output_dir),
                                )
                                .await;
                                let _ = event_tx.send(EngineEvent::ArtifactSaved {
                                    relative_path,
                                    result,
                                });
                            });
                        }
                    }
                }
            }
        });

        Self { cmd_tx, event_rx }
    }

    pub fn fetch_config(&self) {
        let _ = self.cmd_tx.send(EngineCommand::FetchConfig);
    }

    pub fn submit(&self, request: JobRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { request });
    }

    pub fn start_polling(&self, kind: JobKind, task: TaskHandle) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling { kind, task });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn download_artifacts(&self, paths: Vec<String>) {
        let _ = self.cmd_tx.send(EngineCommand::DownloadArtifacts { paths });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn download_artifact(
    api: &dyn TaskApi,
    relative_path: &str,
    writer: AtomicFileWriter,
) -> Result<std::path::PathBuf, ArtifactError> {
    let bytes = api.fetch_artifact(relative_path).await?;
    let filename = artifact_filename(relative_path);
    let saved = writer.write_bytes(&filename, &bytes)?;
    client_info!("saved {relative_path} as {}", saved.display());
    Ok(saved)
}
