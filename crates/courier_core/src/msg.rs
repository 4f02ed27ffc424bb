use chrono::{DateTime, Utc};

use crate::{FileSlot, StagedFile, ToastId};

/// One point-in-time progress report from the backend, as mapped by the
/// platform layer. Applied to job state and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub is_active: bool,
    pub current: u32,
    pub total: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub logs: Vec<String>,
}

/// Backend acknowledgement of a job start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReceipt {
    pub message: String,
    pub total_recipients: u32,
}

/// Terminal reconciliation fetched once after the job leaves Active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalStatusReport {
    pub is_active: bool,
    pub completed: bool,
    pub total_processed: u32,
    pub success_count: u32,
    pub failure_count: u32,
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a file for a staging slot.
    FileChosen { slot: FileSlot, file: StagedFile },
    /// User removed the file staged in a slot.
    FileRemoved { slot: FileSlot },
    /// User cleared both staging slots.
    ClearFilesRequested,
    /// User cleared the activity log.
    ClearLogsRequested,
    /// User asked for a plain-text report of the current run.
    ExportReportRequested,
    /// User asked to start the job.
    StartRequested,
    /// User asked to abort the running job.
    StopRequested,
    /// User acknowledged a finished job, returning to Idle.
    ResetRequested,
    /// Engine finished the start request.
    StartCompleted {
        generation: u64,
        result: Result<StartReceipt, String>,
    },
    /// Engine delivered one poll snapshot.
    SnapshotReceived {
        generation: u64,
        snapshot: ProgressSnapshot,
        at: DateTime<Utc>,
    },
    /// Engine delivered the post-completion status fetch.
    FinalStatusReceived {
        generation: u64,
        report: FinalStatusReport,
        at: DateTime<Utc>,
    },
    /// Engine finished the stop request; `Ok` carries the backend message.
    JobStopped {
        generation: u64,
        result: Result<String, String>,
    },
    /// Engine finished writing the exported report.
    ReportExported { result: Result<String, String> },
    /// User clicked a toast's close button.
    ToastDismissed { id: ToastId },
    /// A toast's display duration elapsed.
    ToastDismissElapsed { id: ToastId },
    /// A toast's exit grace period elapsed.
    ToastExitElapsed { id: ToastId },
    /// UI/render tick to coalesce rendering and promote entering toasts.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
