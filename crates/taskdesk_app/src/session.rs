use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};
use thiserror::Error;
use url::Url;

use taskdesk_core::{
    update, AlignmentOptions, AppState, Effect, JobKind, Msg, PhaseView, ServiceConfig,
    SessionView,
};
use taskdesk_engine::{ApiError, ClientSettings, EngineEvent, EngineHandle};

use crate::cli::Cli;
use crate::prefs::{self, PersistedPrefs};
use crate::render;

const IDLE_SLEEP: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid server url: {0}")]
    InvalidServer(String),
    #[error(transparent)]
    Engine(#[from] ApiError),
}

/// Run one job end to end: submit, watch it to a terminal state, download
/// the artifacts. Returns the process exit code.
pub fn run(cli: Cli) -> Result<ExitCode, SessionError> {
    let base_url = Url::parse(&cli.server)
        .map_err(|err| SessionError::InvalidServer(err.to_string()))?;
    let loaded_prefs = prefs::load(&cli.output_dir);
    let request = cli.command.to_request(&loaded_prefs);

    let settings = ClientSettings {
        base_url,
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        output_dir: cli.output_dir.clone(),
        ..ClientSettings::default()
    };
    let engine = EngineHandle::new(settings)?;

    let used_prefs = match &request.kind {
        JobKind::Alignment(options) => Some(PersistedPrefs {
            source_lang: Some(options.source_lang.clone()),
            target_lang: Some(options.target_lang.clone()),
            model_name: Some(options.model_name.clone()),
        }),
        _ => None,
    };

    let mut session = Session::new(engine);
    session.dispatch(Msg::Started);

    // Alignment selections are checked against the server catalogue (or
    // the built-in fallback when the fetch fails) before anything is
    // uploaded.
    if let JobKind::Alignment(options) = &request.kind {
        session.wait_for_config();
        if let Some(text) = catalogue_error(options, session.state.config()) {
            eprintln!("error: {text}");
            return Ok(ExitCode::from(2));
        }
    }

    session.dispatch(Msg::SubmitRequested(request));

    // A submission that never left Idle was rejected by validation.
    if let PhaseView::Idle = session.state.view().phase {
        if let Some(notice) = session.state.view().notice {
            eprintln!("error: {}", notice.text);
        }
        return Ok(ExitCode::from(2));
    }

    loop {
        let mut had_event = false;
        while let Some(event) = session.engine.try_recv() {
            had_event = true;
            session.handle_event(event);
        }

        if session.state.consume_dirty() {
            session.render();
        }

        match session.state.view().phase {
            PhaseView::Failed => return Ok(ExitCode::FAILURE),
            PhaseView::Idle => {
                // Submission failed after leaving Idle once; the notice was
                // already rendered.
                return Ok(ExitCode::FAILURE);
            }
            PhaseView::Completed if session.pending_downloads == 0 => {
                if let Some(prefs) = used_prefs {
                    prefs::save(&cli.output_dir, &prefs);
                }
                return Ok(if session.download_failures == 0 {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                });
            }
            _ => {}
        }

        if !had_event {
            thread::sleep(IDLE_SLEEP);
        }
    }
}

/// The catalogue only constrains alignment: its language and model names
/// must come from the (possibly fallback) config, so a typo fails here
/// instead of as an opaque server rejection.
fn catalogue_error(options: &AlignmentOptions, config: &ServiceConfig) -> Option<String> {
    let languages = SessionView::language_names(config);
    for (role, value) in [
        ("source language", &options.source_lang),
        ("target language", &options.target_lang),
    ] {
        if !languages.contains(&value.as_str()) {
            return Some(format!(
                "unknown {role} `{value}` (available: {})",
                languages.join(", ")
            ));
        }
    }
    let models = SessionView::model_names(config);
    if !models.contains(&options.model_name.as_str()) {
        return Some(format!(
            "unknown model `{}` (available: {})",
            options.model_name,
            models.join(", ")
        ));
    }
    None
}

struct Session {
    engine: EngineHandle,
    state: AppState,
    config_settled: bool,
    pending_downloads: usize,
    download_failures: usize,
    shown_details: usize,
    shown_log: usize,
}

impl Session {
    fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            state: AppState::new(),
            config_settled: false,
            pending_downloads: 0,
            download_failures: 0,
            shown_details: 0,
            shown_log: 0,
        }
    }

    /// Block until the config fetch resolved one way or the other. The
    /// engine always answers, with the error event at the latest when the
    /// request times out.
    fn wait_for_config(&mut self) {
        while !self.config_settled {
            match self.engine.try_recv() {
                Some(event) => self.handle_event(event),
                None => thread::sleep(IDLE_SLEEP),
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::FetchConfig => self.engine.fetch_config(),
            Effect::SubmitJob { request } => self.engine.submit(request),
            Effect::StartPolling { kind, task } => self.engine.start_polling(kind, task),
            Effect::StopPolling => self.engine.stop_polling(),
            Effect::DownloadArtifacts { paths } => {
                self.pending_downloads += paths.len();
                self.engine.download_artifacts(paths);
            }
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::ConfigLoaded { result } => {
                self.config_settled = true;
                match result {
                    Ok(config) => self.dispatch(Msg::ConfigLoaded(config)),
                    Err(err) => {
                        client_warn!("config fetch failed, using built-in defaults: {err}");
                        self.dispatch(Msg::ConfigFailed {
                            message: err.to_string(),
                        });
                    }
                }
            }
            EngineEvent::SubmitFinished { result } => match result {
                Ok(outcome) => self.dispatch(Msg::SubmitFinished(outcome)),
                Err(err) => self.dispatch(Msg::SubmitFailed {
                    message: err.to_string(),
                }),
            },
            EngineEvent::Status { seq, snapshot } => {
                self.dispatch(Msg::StatusArrived { seq, snapshot });
            }
            EngineEvent::ArtifactSaved {
                relative_path,
                result,
            } => {
                self.pending_downloads = self.pending_downloads.saturating_sub(1);
                match result {
                    Ok(path) => {
                        client_info!("artifact {relative_path} saved");
                        println!("saved {relative_path} -> {}", path.display());
                    }
                    Err(err) => {
                        self.download_failures += 1;
                        eprintln!("failed to download {relative_path}: {err}");
                    }
                }
            }
        }
    }

    fn render(&mut self) {
        let view = self.state.view();
        match view.phase {
            PhaseView::Submitting | PhaseView::Polling => {
                render::render_status(&view);
                self.shown_details = render::render_detail_delta(&view.details, self.shown_details);
                self.shown_log = render::render_stream_delta(&view.stream_log, self.shown_log);
            }
            PhaseView::Completed => render::render_summary(&view),
            PhaseView::Failed => render::render_failure(&view),
            PhaseView::Idle => {
                if let Some(notice) = view.notice {
                    eprintln!("error: {}", notice.text);
                }
            }
        }
    }
}
