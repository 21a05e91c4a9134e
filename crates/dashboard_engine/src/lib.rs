//! Dashboard engine: HTTP transport, state store and the search/poll drivers.
mod api;
mod orchestrator;
mod poller;
mod session;
mod settings;
mod store;
mod transport;
mod types;

pub use api::{BackendApi, SearchBody, SearchReply};
pub use orchestrator::SearchOrchestrator;
pub use poller::{PollHandle, ResultPoller};
pub use session::{Session, SessionError};
pub use settings::{ClientSettings, Endpoints, SettingsError};
pub use store::{StateObserver, StateStore, SubscriptionId};
pub use transport::{HttpMethod, ReqwestTransport, Transport, TransportRequest};
pub use types::TransportError;
