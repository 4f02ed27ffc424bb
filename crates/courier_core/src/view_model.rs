use crate::{JobPhase, LogKind, ToastId, ToastKind, ToastVisibility};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFileView {
    pub name: String,
    pub len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StagingView {
    pub recipients: Option<StagedFileView>,
    pub attachment: Option<StagedFileView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntryView {
    pub message: String,
    pub kind: LogKind,
    /// Client-observed classification time, formatted as HH:MM:SS.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub visibility: ToastVisibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: JobPhase,
    pub staged: StagingView,
    pub current: u32,
    pub total: u32,
    pub success_count: u32,
    pub failure_count: u32,
    /// Whole-number completion percentage; 0 while `total` is unknown.
    pub percent: u8,
    pub entries: Vec<LogEntryView>,
    pub toasts: Vec<ToastView>,
    pub dirty: bool,
}
