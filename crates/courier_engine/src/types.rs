use std::io;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

/// Progress payload returned by `GET /api/progress`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressReport {
    pub is_active: bool,
    pub current: u32,
    pub total: u32,
    pub success_count: u32,
    pub failure_count: u32,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Terminal payload returned by `GET /api/status`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusReport {
    pub is_active: bool,
    pub completed: bool,
    pub total_processed: u32,
    pub success_count: u32,
    pub failure_count: u32,
    #[serde(default)]
    pub logs: Vec<String>,
}

/// Acknowledgement returned by `POST /api/send`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartAck {
    pub message: String,
    pub total_recipients: u32,
}

/// Acknowledgement returned by `POST /api/stop`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StopAck {
    pub message: String,
}

/// Payload returned by `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub is_active: bool,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend refused the request and supplied an `{error}` body. The
    /// message is surfaced to the user verbatim.
    #[error("{message}")]
    Rejected { message: String },
    #[error("backend returned http status {status}")]
    Http { status: u16 },
    #[error("network error: {0}")]
    Transport(String),
    #[error("malformed backend response: {0}")]
    Decode(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Events the engine reports back to the platform loop. Error branches carry
/// display strings because the loop only forwards them into toasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The start request finished, one way or the other.
    StartFinished {
        generation: u64,
        result: Result<StartAck, String>,
    },
    /// One successful poll tick. Failed ticks emit nothing; the poller
    /// retries on its next interval.
    Snapshot {
        generation: u64,
        report: ProgressReport,
    },
    /// The post-completion status fetch succeeded. A failed fetch emits
    /// nothing so the previously applied state is retained.
    FinalStatus {
        generation: u64,
        report: StatusReport,
    },
    /// The stop request finished; `Ok` carries the backend message.
    StopFinished {
        generation: u64,
        result: Result<String, String>,
    },
    /// The report write finished; `Ok` carries the written path.
    ReportWritten { result: Result<String, String> },
    /// The backend liveness probe finished.
    HealthChecked { result: Result<HealthReport, String> },
}
