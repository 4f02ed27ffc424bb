use crate::{AppState, Effect, JobPhase, Msg, ToastKind};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileChosen { slot, file } => match state.select_file(slot, file) {
            Ok(()) => Vec::new(),
            Err(err) => vec![state.push_toast(err.to_string(), ToastKind::Error)],
        },
        Msg::FileRemoved { slot } => {
            state.remove_file(slot);
            Vec::new()
        }
        Msg::ClearFilesRequested => {
            if matches!(state.phase(), JobPhase::Starting | JobPhase::Active) {
                vec![state.push_toast(
                    "A sending process is already active",
                    ToastKind::Error,
                )]
            } else {
                state.clear_files();
                vec![state.push_toast("Files cleared successfully", ToastKind::Success)]
            }
        }
        Msg::ClearLogsRequested => {
            state.clear_logs();
            vec![state.push_toast("Logs cleared", ToastKind::Info)]
        }
        Msg::ExportReportRequested => {
            vec![Effect::ExportReport {
                summary: state.report_summary(),
            }]
        }
        Msg::StartRequested => match state.begin_start() {
            Ok(start) => vec![start],
            Err(blocked) => vec![state.push_toast(blocked.to_string(), ToastKind::Error)],
        },
        Msg::StopRequested => {
            if state.phase() == JobPhase::Active {
                vec![Effect::StopJob {
                    generation: state.generation(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::ResetRequested => {
            state.reset();
            Vec::new()
        }
        Msg::StartCompleted { generation, result } => {
            if state.phase() != JobPhase::Starting || state.generation() != generation {
                return (state, Vec::new());
            }
            match result {
                Ok(receipt) => {
                    state.apply_start_success(&receipt);
                    vec![
                        Effect::BeginPolling { generation },
                        state.push_toast(
                            "Message sending process started successfully!",
                            ToastKind::Success,
                        ),
                    ]
                }
                Err(error) => {
                    state.apply_start_failure();
                    vec![state.push_toast(error, ToastKind::Error)]
                }
            }
        }
        Msg::SnapshotReceived {
            generation,
            snapshot,
            at,
        } => {
            if !state.accepts_poll(generation) {
                return (state, Vec::new());
            }
            if !state.apply_snapshot(&snapshot, at) {
                // Out-of-order tick; the applied state is already ahead.
                return (state, Vec::new());
            }
            if snapshot.is_active {
                Vec::new()
            } else {
                state.complete_job();
                vec![
                    Effect::StopPolling,
                    Effect::FetchFinalStatus { generation },
                    state.push_toast(
                        "Message sending process completed!",
                        ToastKind::Success,
                    ),
                ]
            }
        }
        Msg::FinalStatusReceived {
            generation,
            report,
            at,
        } => {
            if !state.accepts_final_status(generation) {
                return (state, Vec::new());
            }
            state.apply_final_status(&report, at);
            Vec::new()
        }
        Msg::JobStopped { generation, result } => match result {
            Ok(_message) => {
                if !state.accepts_poll(generation) {
                    return (state, Vec::new());
                }
                state.fail_job();
                vec![
                    Effect::StopPolling,
                    state.push_toast("Sending process stopped", ToastKind::Info),
                ]
            }
            Err(error) => vec![state.push_toast(error, ToastKind::Error)],
        },
        Msg::ReportExported { result } => match result {
            Ok(path) => vec![state.push_toast(
                format!("Report saved to {path}"),
                ToastKind::Success,
            )],
            Err(error) => vec![state.push_toast(error, ToastKind::Error)],
        },
        Msg::ToastDismissed { id } | Msg::ToastDismissElapsed { id } => {
            state.dismiss_toast(id).into_iter().collect()
        }
        Msg::ToastExitElapsed { id } => {
            state.remove_toast(id);
            Vec::new()
        }
        Msg::Tick => {
            state.promote_toasts();
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
