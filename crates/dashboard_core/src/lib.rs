//! Dashboard core: pure search/poll state machine and view-model helpers.
mod effect;
mod failure;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use failure::{
    Flow, RequestFailure, GENERIC_SERVER_MESSAGE, INVALID_RESPONSE_MESSAGE, NO_RESPONSE_MESSAGE,
};
pub use msg::Msg;
pub use state::{
    DashboardState, ProcessedSnapshot, SearchId, SearchInput, SearchPhase, FETCH_FAILED_SENTINEL,
};
pub use update::update;
pub use view_model::DashboardView;
