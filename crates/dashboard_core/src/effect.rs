use crate::{SearchId, SearchInput};

/// Side effects requested by [`crate::update`]; executed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// `POST /search` for the given attempt.
    PostSearch { search_id: SearchId, input: SearchInput },
    /// `POST /process` for the given attempt, issued only after its search responded.
    PostProcess { search_id: SearchId, input: SearchInput },
    /// Fetch the latest snapshot now instead of waiting for the next poll tick.
    RefreshSnapshot,
}
