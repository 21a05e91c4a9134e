use std::collections::VecDeque;

use dashboard_core::{Effect, Msg, SearchInput};
use engine_logging::{engine_debug, engine_info};

use crate::{BackendApi, ResultPoller, StateStore};

/// Runs the search-then-process sequence and asks the poller for a refresh
/// once processing succeeded.
#[derive(Clone)]
pub struct SearchOrchestrator {
    store: StateStore,
    api: BackendApi,
    poller: ResultPoller,
}

impl SearchOrchestrator {
    pub fn new(store: StateStore, api: BackendApi, poller: ResultPoller) -> Self {
        Self { store, api, poller }
    }

    /// Searches with the input currently held by the store.
    pub async fn submit(&self) {
        let view = self.store.view();
        self.run_search(SearchInput::new(view.query, view.location))
            .await;
    }

    /// Runs one attempt to completion. Failures end up in the store's error
    /// state; nothing is retried.
    pub async fn run_search(&self, input: SearchInput) {
        engine_info!(
            "search requested query={:?} location={:?}",
            input.query,
            input.location
        );
        let mut pending: VecDeque<Effect> =
            self.store.dispatch(Msg::SearchSubmitted(input)).into();

        // Effects run one at a time, so `/process` only goes out after `/search` answered.
        while let Some(effect) = pending.pop_front() {
            if let Some(msg) = self.execute(effect).await {
                pending.extend(self.store.dispatch(msg));
            }
        }
    }

    async fn execute(&self, effect: Effect) -> Option<Msg> {
        match effect {
            Effect::PostSearch { search_id, input } => {
                engine_debug!("search #{} -> searching", search_id);
                Some(match self.api.search(&input).await {
                    Ok(reply) => Msg::SearchResponded {
                        search_id,
                        input,
                        message: reply.message,
                    },
                    Err(failure) => {
                        engine_info!("search #{} failed at search: {:?}", search_id, failure);
                        Msg::SearchFailed { search_id, failure }
                    }
                })
            }
            Effect::PostProcess { search_id, input } => {
                engine_debug!("search #{} -> processing", search_id);
                Some(match self.api.process(&input).await {
                    Ok(()) => Msg::ProcessResponded { search_id },
                    Err(failure) => {
                        engine_info!("search #{} failed at process: {:?}", search_id, failure);
                        Msg::ProcessFailed { search_id, failure }
                    }
                })
            }
            Effect::RefreshSnapshot => {
                engine_debug!("processing done; refreshing snapshot");
                self.poller.refresh_now();
                None
            }
        }
    }
}
