use std::path::PathBuf;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use chrono::{DateTime, Utc};
use courier_logging::{courier_error, courier_warn};

use crate::poller::{PollSettings, ProgressPoller};
use crate::report::{render_report, report_file_name, ReportData};
use crate::{
    write_report_atomic, EngineEvent, InputArtifact, JobService, ReqwestJobService,
    ServiceSettings,
};

enum EngineCommand {
    StartJob {
        generation: u64,
        recipients: InputArtifact,
        attachment: Option<InputArtifact>,
    },
    BeginPolling {
        generation: u64,
    },
    StopPolling,
    FetchFinalStatus {
        generation: u64,
    },
    StopJob {
        generation: u64,
    },
    ExportReport {
        data: ReportData,
    },
    CheckHealth,
}

/// Engine configuration assembled by the platform layer.
#[derive(Clone)]
pub struct EngineConfig {
    pub service: ServiceSettings,
    pub poll: PollSettings,
    /// Directory exported reports are written into.
    pub report_dir: PathBuf,
    /// Clock used for report stamps; injectable for tests.
    pub now_utc: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>,
}

impl EngineConfig {
    pub fn default_with_report_dir(report_dir: PathBuf) -> Self {
        Self {
            service: ServiceSettings::default(),
            poll: PollSettings::default(),
            report_dir,
            now_utc: Arc::new(Utc::now),
        }
    }
}

/// Handle to the engine thread. Commands go in over a channel; events come
/// back over another and are drained by the platform's pump with `try_recv`.
/// The receiver sits behind a mutex so the handle can be shared across the
/// dispatch and pump threads.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || run_engine(config, cmd_rx, event_tx));

        Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
        }
    }

    pub fn start_job(
        &self,
        generation: u64,
        recipients: InputArtifact,
        attachment: Option<InputArtifact>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::StartJob {
            generation,
            recipients,
            attachment,
        });
    }

    pub fn begin_polling(&self, generation: u64) {
        let _ = self.cmd_tx.send(EngineCommand::BeginPolling { generation });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn fetch_final_status(&self, generation: u64) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::FetchFinalStatus { generation });
    }

    pub fn stop_job(&self, generation: u64) {
        let _ = self.cmd_tx.send(EngineCommand::StopJob { generation });
    }

    pub fn export_report(&self, data: ReportData) {
        let _ = self.cmd_tx.send(EngineCommand::ExportReport { data });
    }

    pub fn check_health(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CheckHealth);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

fn run_engine(
    config: EngineConfig,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            courier_error!("Failed to start engine runtime: {err}");
            return;
        }
    };
    let service: Arc<dyn JobService> = match ReqwestJobService::new(config.service.clone()) {
        Ok(service) => Arc::new(service),
        Err(err) => {
            courier_error!("Failed to build backend client: {err}");
            return;
        }
    };

    // At most one poller exists at a time; a new BeginPolling replaces (and
    // cancels) any survivor from an earlier generation.
    let mut poller: Option<ProgressPoller> = None;

    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::StartJob {
                generation,
                recipients,
                attachment,
            } => {
                let service = service.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = service
                        .start(&recipients, attachment.as_ref())
                        .await
                        .map_err(|err| err.to_string());
                    let _ = event_tx.send(EngineEvent::StartFinished { generation, result });
                });
            }
            EngineCommand::BeginPolling { generation } => {
                if let Some(active) = poller.take() {
                    active.cancel();
                }
                poller = Some(ProgressPoller::begin(
                    service.clone(),
                    generation,
                    config.poll.clone(),
                    runtime.handle(),
                    event_tx.clone(),
                ));
            }
            EngineCommand::StopPolling => {
                if let Some(active) = poller.take() {
                    active.cancel();
                }
            }
            EngineCommand::FetchFinalStatus { generation } => {
                let service = service.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    match service.status().await {
                        Ok(report) => {
                            let _ =
                                event_tx.send(EngineEvent::FinalStatus { generation, report });
                        }
                        Err(err) => {
                            // The state applied from the last snapshot stands.
                            courier_warn!("Final status fetch failed: {err}");
                        }
                    }
                });
            }
            EngineCommand::StopJob { generation } => {
                let service = service.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = service
                        .stop()
                        .await
                        .map(|ack| ack.message)
                        .map_err(|err| err.to_string());
                    let _ = event_tx.send(EngineEvent::StopFinished { generation, result });
                });
            }
            EngineCommand::ExportReport { data } => {
                let now = (config.now_utc)();
                let text = render_report(&data, now);
                let result = write_report_atomic(&config.report_dir, &report_file_name(now), &text)
                    .map(|path| path.display().to_string())
                    .map_err(|err| format!("Failed to write report: {err}"));
                let _ = event_tx.send(EngineEvent::ReportWritten { result });
            }
            EngineCommand::CheckHealth => {
                let service = service.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let result = service.health().await.map_err(|err| err.to_string());
                    let _ = event_tx.send(EngineEvent::HealthChecked { result });
                });
            }
        }
    }
}
