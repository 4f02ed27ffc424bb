use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use courier_core::{update, AppState, FileSlot, JobPhase, Msg, StagedFile};
use courier_logging::{courier_info, LogDestination};

use super::config;
use super::effects::EffectRunner;
use super::render::Renderer;

/// Cadence of the render/housekeeping tick.
const TICK_INTERVAL: Duration = Duration::from_millis(75);

struct CliArgs {
    recipients: PathBuf,
    attachment: Option<PathBuf>,
    export_report: bool,
}

pub fn run_app() -> anyhow::Result<()> {
    courier_logging::initialize(LogDestination::Both);

    let args = parse_args(std::env::args().skip(1))?;
    let config = config::load_config(Path::new("."));
    courier_info!("Using backend at {}", config.backend_url);

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(msg_tx.clone(), &config);
    runner.check_health();

    // Background tick to advance toast visibility and throttle rendering.
    {
        let tick_tx = msg_tx.clone();
        thread::spawn(move || {
            while tick_tx.send(Msg::Tick).is_ok() {
                thread::sleep(TICK_INTERVAL);
            }
        });
    }

    let mut state = AppState::new();
    state.set_toast_duration(config.toast_duration());
    let mut renderer = Renderer::new();

    // Stage the command-line files and kick the job off.
    state = dispatch(
        state,
        Msg::FileChosen {
            slot: FileSlot::Recipients,
            file: staged_from_path(&args.recipients)?,
        },
        &runner,
        &mut renderer,
    );
    if let Some(path) = &args.attachment {
        state = dispatch(
            state,
            Msg::FileChosen {
                slot: FileSlot::Attachment,
                file: staged_from_path(path)?,
            },
            &runner,
            &mut renderer,
        );
    }
    state = dispatch(state, Msg::StartRequested, &runner, &mut renderer);

    let mut report_requested = false;
    while let Ok(msg) = msg_rx.recv() {
        state = dispatch(state, msg, &runner, &mut renderer);

        let view = state.view();
        let job_over = matches!(
            view.phase,
            JobPhase::Idle | JobPhase::Completed | JobPhase::Failed
        );

        if job_over && args.export_report && !report_requested {
            report_requested = true;
            state = dispatch(state, Msg::ExportReportRequested, &runner, &mut renderer);
            continue;
        }

        // Done once the run concluded and every toast has played out.
        if job_over && view.toasts.is_empty() {
            break;
        }
    }

    Ok(())
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner, renderer: &mut Renderer) -> AppState {
    let (mut state, effects) = update(state, msg);
    runner.run(effects);

    if state.consume_dirty() {
        for line in renderer.lines(&state.view()) {
            println!("{line}");
        }
    }
    state
}

fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<CliArgs> {
    let mut recipients = None;
    let mut attachment = None;
    let mut export_report = false;

    for arg in args {
        match arg.as_str() {
            "--report" => export_report = true,
            "--help" | "-h" => {
                bail!("usage: courier_app <recipients.xlsx> [attachment] [--report]")
            }
            _ if recipients.is_none() => recipients = Some(PathBuf::from(arg)),
            _ if attachment.is_none() => attachment = Some(PathBuf::from(arg)),
            other => bail!("unexpected argument `{other}`"),
        }
    }

    let Some(recipients) = recipients else {
        bail!("usage: courier_app <recipients.xlsx> [attachment] [--report]")
    };

    Ok(CliArgs {
        recipients,
        attachment,
        export_report,
    })
}

fn staged_from_path(path: &Path) -> anyhow::Result<StagedFile> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("cannot read input file {}", path.display()))?;
    if !meta.is_file() {
        bail!("{} is not a regular file", path.display());
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(StagedFile {
        name,
        path: path.to_path_buf(),
        len: meta.len(),
    })
}
