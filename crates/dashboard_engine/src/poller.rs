use std::time::Duration;

use dashboard_core::Msg;
use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{BackendApi, StateStore};

/// Fetches the processed-result snapshot, on demand or on a fixed cadence.
#[derive(Clone)]
pub struct ResultPoller {
    store: StateStore,
    api: BackendApi,
}

impl ResultPoller {
    pub fn new(store: StateStore, api: BackendApi) -> Self {
        Self { store, api }
    }

    /// One `GET /api/results`, written into the store. Never fails; failures
    /// become the store's error state.
    pub async fn fetch_snapshot(&self) {
        let msg = match self.api.results().await {
            Ok(payload) => Msg::SnapshotReceived(payload),
            Err(failure) => {
                engine_warn!("snapshot fetch failed: {:?}", failure);
                Msg::SnapshotFailed(failure)
            }
        };
        self.store.dispatch(msg);
    }

    /// Fetches out of band without waiting for the next tick.
    pub fn refresh_now(&self) -> JoinHandle<()> {
        let poller = self.clone();
        tokio::spawn(async move { poller.fetch_snapshot().await })
    }

    /// Fetches immediately, then every `interval` until the handle is stopped.
    ///
    /// Each tick spawns its own fetch, so a slow response can overlap the next
    /// tick; whichever completes last wins.
    pub fn start(&self, interval: Duration) -> PollHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let poller = self.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        engine_debug!("poll tick");
                        poller.refresh_now();
                    }
                }
            }
            engine_debug!("poll loop exited");
        });

        engine_info!("polling every {:?}", interval);
        PollHandle {
            cancel,
            task: Some(task),
        }
    }
}

/// The one live poll schedule of a session. Stopping consumes the handle;
/// dropping it also cancels the schedule.
pub struct PollHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn stop(mut self) {
        self.cancel_schedule();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn cancel_schedule(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
            engine_info!("polling stopped");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel_schedule();
    }
}
