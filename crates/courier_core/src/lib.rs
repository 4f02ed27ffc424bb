//! Courier core: pure orchestration state machine and view-model helpers.
mod classify;
mod effect;
mod msg;
mod staging;
mod state;
mod toast;
mod update;
mod view_model;

pub use classify::{classify, LogEntry, LogKind};
pub use effect::{Effect, ReportSummary};
pub use msg::{FinalStatusReport, Msg, ProgressSnapshot, StartReceipt};
pub use staging::{
    FileSlot, FileStaging, StagedFile, StagingError, ATTACHMENT_EXTENSIONS, RECIPIENT_EXTENSIONS,
};
pub use state::{AppState, JobPhase, StartBlocked};
pub use toast::{Toast, ToastId, ToastKind, ToastVisibility, EXIT_GRACE, TOAST_DURATION};
pub use update::update;
pub use view_model::{AppViewModel, LogEntryView, StagedFileView, StagingView, ToastView};
