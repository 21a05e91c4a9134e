use serde_json::Value;

use crate::{SearchId, SearchPhase};

/// Read-only projection handed to observers such as the rendering layer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardView {
    pub query: String,
    pub location: String,
    pub phase: SearchPhase,
    pub active_search: Option<SearchId>,
    pub search_message: Option<String>,
    pub payload: Option<Value>,
    pub raw_json: String,
    pub error: Option<String>,
}
