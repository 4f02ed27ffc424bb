use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use courier_logging::courier_warn;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, JobService};

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Cadence of the progress fetch while the job is active.
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
        }
    }
}

/// A cancellable progress poll loop for one start generation.
///
/// Every tick fetches the progress endpoint and forwards the snapshot. A
/// failed tick is skipped, not fatal: the backend keeps working through
/// transient network blips, so the loop just waits for the next interval.
/// The loop ends itself right after forwarding an inactive snapshot, so no
/// polling outlives the job it watched.
pub struct ProgressPoller {
    token: CancellationToken,
}

impl ProgressPoller {
    pub fn begin(
        service: Arc<dyn JobService>,
        generation: u64,
        settings: PollSettings,
        handle: &tokio::runtime::Handle,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Self {
        let token = CancellationToken::new();
        let watched = token.clone();

        handle.spawn(async move {
            let mut interval = tokio::time::interval(settings.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = watched.cancelled() => break,
                    _ = interval.tick() => {}
                }

                match service.progress().await {
                    Ok(report) => {
                        if watched.is_cancelled() {
                            // Cancelled while the request was in flight; the
                            // response is stale and must not be forwarded.
                            break;
                        }
                        let job_over = !report.is_active;
                        if event_tx
                            .send(EngineEvent::Snapshot { generation, report })
                            .is_err()
                        {
                            break;
                        }
                        if job_over {
                            break;
                        }
                    }
                    Err(err) => {
                        courier_warn!("Progress poll failed, retrying next tick: {err}");
                    }
                }
            }
        });

        Self { token }
    }

    /// Stop the loop. Safe to call any number of times, including after the
    /// loop already ended on its own.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}
