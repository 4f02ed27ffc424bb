use std::collections::BTreeSet;

use courier_core::{AppViewModel, JobPhase, LogKind, ToastId, ToastKind, ToastVisibility};

/// Turns successive view snapshots into terminal lines, printing each piece
/// of news once: phase changes, moved progress, fresh log entries, and
/// newly visible toasts.
pub struct Renderer {
    last_phase: JobPhase,
    last_counts: Option<(u32, u32, u32, u32)>,
    printed_entries: usize,
    announced_toasts: BTreeSet<ToastId>,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last_phase: JobPhase::Idle,
            last_counts: None,
            printed_entries: 0,
            announced_toasts: BTreeSet::new(),
        }
    }

    pub fn lines(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut out = Vec::new();

        if view.phase != self.last_phase {
            out.push(phase_line(view));
            self.last_phase = view.phase;
        }

        let counts = (
            view.current,
            view.total,
            view.success_count,
            view.failure_count,
        );
        if view.total > 0 && self.last_counts != Some(counts) {
            out.push(format!(
                "Progress: {}/{} ({}%), {} successful, {} failed",
                view.current, view.total, view.percent, view.success_count, view.failure_count
            ));
            self.last_counts = Some(counts);
        }

        // The entry list only ever grows in place; a shrink means the log
        // was cleared and the cursor starts over.
        if view.entries.len() < self.printed_entries {
            self.printed_entries = 0;
        }
        for entry in &view.entries[self.printed_entries..] {
            out.push(format!(
                "[{}] {:<7} {}",
                entry.timestamp,
                kind_label(entry.kind),
                entry.message
            ));
        }
        self.printed_entries = view.entries.len();

        for toast in &view.toasts {
            if toast.visibility == ToastVisibility::Visible
                && self.announced_toasts.insert(toast.id)
            {
                out.push(format!("({}) {}", toast_label(toast.kind), toast.message));
            }
        }

        out
    }
}

fn phase_line(view: &AppViewModel) -> String {
    match view.phase {
        JobPhase::Idle => "Ready.".to_string(),
        JobPhase::Starting => "Starting job...".to_string(),
        JobPhase::Active => format!("Sending in progress ({} recipients)...", view.total),
        JobPhase::Completed => "Process complete.".to_string(),
        JobPhase::Failed => "Process stopped before completion.".to_string(),
    }
}

fn kind_label(kind: LogKind) -> &'static str {
    match kind {
        LogKind::Success => "ok",
        LogKind::Error => "error",
        LogKind::Info => "info",
    }
}

fn toast_label(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "success",
        ToastKind::Error => "error",
        ToastKind::Warning => "warning",
        ToastKind::Info => "notice",
    }
}
