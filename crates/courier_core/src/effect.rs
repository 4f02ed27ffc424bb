use std::time::Duration;

use crate::{LogEntry, StagedFile, ToastId};

/// Data needed to write the exported run report. Captured at request time so
/// the writer never reads live state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub current: u32,
    pub total: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub entries: Vec<LogEntry>,
}

/// IO and timer work requested by `update`. Effects are plain data; the
/// platform layer executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Upload the staged files and start the backend job.
    StartJob {
        generation: u64,
        recipients: StagedFile,
        attachment: Option<StagedFile>,
    },
    /// Spawn the progress poll loop for this start generation.
    BeginPolling { generation: u64 },
    /// Cancel the poll loop. Idempotent.
    StopPolling,
    /// Fetch the terminal status once after the job left Active.
    FetchFinalStatus { generation: u64 },
    /// Ask the backend to abort the running job.
    StopJob { generation: u64 },
    /// Write a plain-text report of the run.
    ExportReport { summary: ReportSummary },
    /// Arrange for `Msg::ToastDismissElapsed { id }` after `after`.
    ScheduleToastDismiss { id: ToastId, after: Duration },
    /// Arrange for `Msg::ToastExitElapsed { id }` after `after`.
    ScheduleToastRemoval { id: ToastId, after: Duration },
}
