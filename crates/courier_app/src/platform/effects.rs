use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use courier_core::{
    Effect, FinalStatusReport, LogEntry, LogKind, Msg, ProgressSnapshot, ReportSummary,
    StagedFile, StartReceipt,
};
use courier_engine::{
    EngineConfig, EngineEvent, EngineHandle, InputArtifact, ReportData, ReportLine,
};
use courier_logging::{courier_info, courier_warn};

use super::config::AppConfig;

/// Executes core effects: engine commands for IO work, spawned sleeps for
/// toast timers. Engine events are pumped back into the message channel on
/// a dedicated thread, stamped with the wall clock at arrival.
pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(msg_tx: mpsc::Sender<Msg>, config: &AppConfig) -> Self {
        let mut engine_config = EngineConfig::default_with_report_dir(config.report_dir.clone());
        engine_config.service.base_url = config.backend_url.clone();
        engine_config.poll.interval = config.poll_interval();
        let engine = Arc::new(EngineHandle::new(engine_config));

        let runner = Self {
            engine,
            msg_tx: msg_tx.clone(),
        };
        runner.spawn_event_pump(msg_tx);
        runner
    }

    /// One-shot backend liveness probe, logged when the answer arrives.
    pub fn check_health(&self) {
        self.engine.check_health();
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob {
                    generation,
                    recipients,
                    attachment,
                } => {
                    courier_info!(
                        "StartJob generation={} recipients={} attachment={:?}",
                        generation,
                        recipients.name,
                        attachment.as_ref().map(|f| f.name.as_str())
                    );
                    self.engine.start_job(
                        generation,
                        to_artifact(recipients),
                        attachment.map(to_artifact),
                    );
                }
                Effect::BeginPolling { generation } => {
                    self.engine.begin_polling(generation);
                }
                Effect::StopPolling => {
                    self.engine.stop_polling();
                }
                Effect::FetchFinalStatus { generation } => {
                    self.engine.fetch_final_status(generation);
                }
                Effect::StopJob { generation } => {
                    self.engine.stop_job(generation);
                }
                Effect::ExportReport { summary } => {
                    self.engine.export_report(to_report_data(summary));
                }
                Effect::ScheduleToastDismiss { id, after } => {
                    self.schedule(Msg::ToastDismissElapsed { id }, after);
                }
                Effect::ScheduleToastRemoval { id, after } => {
                    self.schedule(Msg::ToastExitElapsed { id }, after);
                }
            }
        }
    }

    fn schedule(&self, msg: Msg, after: Duration) {
        let tx = self.msg_tx.clone();
        thread::spawn(move || {
            thread::sleep(after);
            let _ = tx.send(msg);
        });
    }

    fn spawn_event_pump(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if msg_tx.send(to_msg(event)).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn to_artifact(file: StagedFile) -> InputArtifact {
    InputArtifact {
        name: file.name,
        path: file.path,
    }
}

fn to_report_data(summary: ReportSummary) -> ReportData {
    ReportData {
        current: summary.current,
        total: summary.total,
        success_count: summary.success_count,
        failure_count: summary.failure_count,
        entries: summary.entries.iter().map(to_report_line).collect(),
    }
}

fn to_report_line(entry: &LogEntry) -> ReportLine {
    ReportLine {
        timestamp: entry.timestamp.format("%H:%M:%S").to_string(),
        label: match entry.kind {
            LogKind::Success => "success".to_string(),
            LogKind::Error => "error".to_string(),
            LogKind::Info => "info".to_string(),
        },
        message: entry.message.clone(),
    }
}

fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StartFinished { generation, result } => Msg::StartCompleted {
            generation,
            result: result.map(|ack| StartReceipt {
                message: ack.message,
                total_recipients: ack.total_recipients,
            }),
        },
        EngineEvent::Snapshot { generation, report } => Msg::SnapshotReceived {
            generation,
            snapshot: ProgressSnapshot {
                is_active: report.is_active,
                current: report.current,
                total: report.total,
                success_count: report.success_count,
                failure_count: report.failure_count,
                logs: report.logs,
            },
            at: Utc::now(),
        },
        EngineEvent::FinalStatus { generation, report } => Msg::FinalStatusReceived {
            generation,
            report: FinalStatusReport {
                is_active: report.is_active,
                completed: report.completed,
                total_processed: report.total_processed,
                success_count: report.success_count,
                failure_count: report.failure_count,
                logs: report.logs,
            },
            at: Utc::now(),
        },
        EngineEvent::StopFinished { generation, result } => {
            Msg::JobStopped { generation, result }
        }
        EngineEvent::ReportWritten { result } => Msg::ReportExported { result },
        EngineEvent::HealthChecked { result } => {
            match result {
                Ok(health) => {
                    courier_info!(
                        "Backend reachable: status={} is_active={}",
                        health.status,
                        health.is_active
                    );
                }
                Err(err) => courier_warn!("Backend health check failed: {err}"),
            }
            Msg::NoOp
        }
    }
}
