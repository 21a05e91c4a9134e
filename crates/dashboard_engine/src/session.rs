use std::sync::Arc;

use dashboard_core::{DashboardView, Msg, SearchInput};
use engine_logging::engine_info;

use crate::{
    BackendApi, ClientSettings, Endpoints, PollHandle, ReqwestTransport, ResultPoller,
    SearchOrchestrator, SettingsError, StateStore, Transport, TransportError,
};

/// One mounted dashboard: a store, the orchestrator and a running poll schedule.
///
/// Must be created inside a tokio runtime. Teardown happens exactly once,
/// through [`Session::stop`] or on drop.
pub struct Session {
    store: StateStore,
    orchestrator: SearchOrchestrator,
    poller: ResultPoller,
    poll_handle: Option<PollHandle>,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Session {
    /// Starts a session talking HTTP through reqwest.
    pub fn connect(settings: ClientSettings) -> Result<Self, SessionError> {
        let transport = ReqwestTransport::new(&settings)?;
        Ok(Self::start(settings, Arc::new(transport))?)
    }

    pub fn start(
        settings: ClientSettings,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, SettingsError> {
        let endpoints = Endpoints::from_settings(&settings)?;
        let poll_interval = settings.poll_interval;
        let api = BackendApi::new(transport, endpoints, settings);

        let store = StateStore::new();
        let poller = ResultPoller::new(store.clone(), api.clone());
        let orchestrator = SearchOrchestrator::new(store.clone(), api, poller.clone());
        let poll_handle = Some(poller.start(poll_interval));

        engine_info!("session started");
        Ok(Self {
            store,
            orchestrator,
            poller,
            poll_handle,
        })
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// A cloneable handle for running searches from spawned tasks.
    pub fn orchestrator(&self) -> SearchOrchestrator {
        self.orchestrator.clone()
    }

    pub fn poller(&self) -> &ResultPoller {
        &self.poller
    }

    pub fn view(&self) -> DashboardView {
        self.store.view()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.store.dispatch(Msg::QueryChanged(query.into()));
    }

    pub fn set_location(&self, location: impl Into<String>) {
        self.store.dispatch(Msg::LocationChanged(location.into()));
    }

    pub async fn run_search(&self, input: SearchInput) {
        self.orchestrator.run_search(input).await;
    }

    pub async fn submit(&self) {
        self.orchestrator.submit().await;
    }

    pub fn stop(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(handle) = self.poll_handle.take() else {
            return;
        };
        handle.stop();
        // In-flight requests may still complete; the closed store drops their writes.
        self.store.close();
        engine_info!("session stopped");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}
