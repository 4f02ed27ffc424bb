use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::toast::ToastQueue;
use crate::view_model::{AppViewModel, LogEntryView, StagedFileView, StagingView, ToastView};
use crate::{
    classify, Effect, FileSlot, FileStaging, FinalStatusReport, LogEntry, ProgressSnapshot,
    ReportSummary, StagedFile, StagingError, StartReceipt, ToastId, ToastKind, EXIT_GRACE,
    TOAST_DURATION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    Starting,
    Active,
    Completed,
    Failed,
}

/// Why a start request was refused. Both cases are recoverable; the message
/// is surfaced as an error toast and no phase transition happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartBlocked {
    #[error("Please select a recipients Excel file first")]
    MissingRecipients,
    #[error("A sending process is already active")]
    JobInProgress,
}

/// The single tracked job. Owned by `AppState`; every mutation goes through
/// `update`, so there is exactly one reconciliation path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct JobState {
    phase: JobPhase,
    /// Incremented on every accepted start. Poll-derived messages carry the
    /// generation they were spawned under; mismatches are discarded, which
    /// keeps in-flight responses from a cancelled poller out of the state.
    generation: u64,
    current: u32,
    total: u32,
    success_count: u32,
    failure_count: u32,
    /// Raw backend log lines, replaced wholesale by each applied snapshot.
    logs: Vec<String>,
    /// Classified entries; each raw line is classified exactly once, when
    /// the snapshot that introduced it is applied.
    entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    staging: FileStaging,
    job: JobState,
    toasts: ToastQueue,
    toast_duration: Duration,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            staging: FileStaging::default(),
            job: JobState::default(),
            toasts: ToastQueue::default(),
            toast_duration: TOAST_DURATION,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the toast display duration (configuration hook).
    pub fn set_toast_duration(&mut self, duration: Duration) {
        self.toast_duration = duration;
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            phase: self.job.phase,
            staged: StagingView {
                recipients: self.staging.recipients().map(staged_view),
                attachment: self.staging.attachment().map(staged_view),
            },
            current: self.job.current,
            total: self.job.total,
            success_count: self.job.success_count,
            failure_count: self.job.failure_count,
            percent: percent(self.job.current, self.job.total),
            entries: self.job.entries.iter().map(entry_view).collect(),
            toasts: self
                .toasts
                .toasts()
                .iter()
                .map(|t| ToastView {
                    id: t.id,
                    message: t.message.clone(),
                    kind: t.kind,
                    visibility: t.visibility,
                })
                .collect(),
            dirty: self.dirty,
        }
    }

    /// Reads and clears the dirty flag; the render loop repaints when true.
    pub fn consume_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    // ---- staging ----

    pub(crate) fn select_file(
        &mut self,
        slot: FileSlot,
        file: StagedFile,
    ) -> Result<(), StagingError> {
        self.staging.select(slot, file)?;
        self.dirty = true;
        Ok(())
    }

    pub(crate) fn remove_file(&mut self, slot: FileSlot) {
        self.staging.remove(slot);
        self.dirty = true;
    }

    pub(crate) fn clear_files(&mut self) {
        self.staging.clear();
        self.dirty = true;
    }

    // ---- job lifecycle ----

    pub(crate) fn phase(&self) -> JobPhase {
        self.job.phase
    }

    pub(crate) fn generation(&self) -> u64 {
        self.job.generation
    }

    /// Validate and apply the Idle -> Starting transition, returning the
    /// start effect. The staged files stay in place so a refused or failed
    /// start can be retried without reselecting.
    pub(crate) fn begin_start(&mut self) -> Result<Effect, StartBlocked> {
        if self.job.phase != JobPhase::Idle {
            return Err(StartBlocked::JobInProgress);
        }
        let Some(recipients) = self.staging.recipients().cloned() else {
            return Err(StartBlocked::MissingRecipients);
        };

        self.job.generation += 1;
        self.job.phase = JobPhase::Starting;
        self.dirty = true;
        Ok(Effect::StartJob {
            generation: self.job.generation,
            recipients,
            attachment: self.staging.attachment().cloned(),
        })
    }

    pub(crate) fn apply_start_success(&mut self, receipt: &StartReceipt) {
        self.job.phase = JobPhase::Active;
        self.job.total = receipt.total_recipients;
        self.job.current = 0;
        self.job.success_count = 0;
        self.job.failure_count = 0;
        self.dirty = true;
    }

    pub(crate) fn apply_start_failure(&mut self) {
        self.job.phase = JobPhase::Idle;
        self.dirty = true;
    }

    /// True when a poll-derived message for `generation` may touch state.
    pub(crate) fn accepts_poll(&self, generation: u64) -> bool {
        self.job.phase == JobPhase::Active && self.job.generation == generation
    }

    /// Overwrite job state from a snapshot and classify its new log lines.
    /// A snapshot whose `current` is behind the applied value is a stale
    /// reordering and is discarded whole (returns false).
    pub(crate) fn apply_snapshot(&mut self, snapshot: &ProgressSnapshot, at: DateTime<Utc>) -> bool {
        if snapshot.current < self.job.current {
            return false;
        }

        self.job.current = snapshot.current;
        self.job.total = snapshot.total;
        self.job.success_count = snapshot.success_count;
        self.job.failure_count = snapshot.failure_count;
        self.absorb_logs(&snapshot.logs, at);
        self.dirty = true;
        true
    }

    pub(crate) fn complete_job(&mut self) {
        self.job.phase = JobPhase::Completed;
        self.dirty = true;
    }

    pub(crate) fn fail_job(&mut self) {
        self.job.phase = JobPhase::Failed;
        self.dirty = true;
    }

    /// True when the terminal status fetch for `generation` may reconcile.
    pub(crate) fn accepts_final_status(&self, generation: u64) -> bool {
        matches!(self.job.phase, JobPhase::Completed | JobPhase::Failed)
            && self.job.generation == generation
    }

    pub(crate) fn apply_final_status(&mut self, report: &FinalStatusReport, at: DateTime<Utc>) {
        self.job.current = self.job.current.max(report.total_processed);
        self.job.success_count = report.success_count;
        self.job.failure_count = report.failure_count;
        self.absorb_logs(&report.logs, at);
        self.dirty = true;
    }

    /// Completed/Failed -> Idle. Clears the job record; staged files and the
    /// generation counter survive.
    pub(crate) fn reset(&mut self) -> bool {
        if !matches!(self.job.phase, JobPhase::Completed | JobPhase::Failed) {
            return false;
        }
        self.job = JobState {
            generation: self.job.generation,
            ..JobState::default()
        };
        self.dirty = true;
        true
    }

    pub(crate) fn clear_logs(&mut self) {
        self.job.logs.clear();
        self.job.entries.clear();
        self.dirty = true;
    }

    pub(crate) fn report_summary(&self) -> ReportSummary {
        ReportSummary {
            current: self.job.current,
            total: self.job.total,
            success_count: self.job.success_count,
            failure_count: self.job.failure_count,
            entries: self.job.entries.clone(),
        }
    }

    // ---- toasts ----

    /// Queue a toast and return the timer effect for its dismissal.
    pub(crate) fn push_toast(&mut self, message: impl Into<String>, kind: ToastKind) -> Effect {
        let id = self.toasts.push(message, kind);
        self.dirty = true;
        Effect::ScheduleToastDismiss {
            id,
            after: self.toast_duration,
        }
    }

    /// Begin a toast's exit; no-op for unknown or already-exiting ids.
    pub(crate) fn dismiss_toast(&mut self, id: ToastId) -> Option<Effect> {
        if self.toasts.begin_exit(id) {
            self.dirty = true;
            Some(Effect::ScheduleToastRemoval {
                id,
                after: EXIT_GRACE,
            })
        } else {
            None
        }
    }

    pub(crate) fn remove_toast(&mut self, id: ToastId) {
        if self.toasts.remove(id) {
            self.dirty = true;
        }
    }

    pub(crate) fn promote_toasts(&mut self) {
        if self.toasts.promote_entering() {
            self.dirty = true;
        }
    }

    /// Classify the lines past the already-known count, then take the
    /// backend's list as the new raw log. Callers apply counts first so a
    /// fresh entry is never paired with stale totals.
    fn absorb_logs(&mut self, logs: &[String], at: DateTime<Utc>) {
        let known = self.job.logs.len();
        for line in logs.iter().skip(known) {
            self.job.entries.push(classify(line, at));
        }
        self.job.logs = logs.to_vec();
    }
}

fn staged_view(file: &StagedFile) -> StagedFileView {
    StagedFileView {
        name: file.name.clone(),
        len: file.len,
    }
}

fn entry_view(entry: &LogEntry) -> LogEntryView {
    LogEntryView {
        message: entry.message.clone(),
        kind: entry.kind,
        timestamp: entry.timestamp.format("%H:%M:%S").to_string(),
    }
}

fn percent(current: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (u64::from(current) * 100 + u64::from(total) / 2) / u64::from(total);
    scaled.min(100) as u8
}
