use serde_json::Value;

use crate::view_model::DashboardView;

pub type SearchId = u64;

/// Raw text shown after a failed snapshot fetch.
pub const FETCH_FAILED_SENTINEL: &str = "Failed to fetch results.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
    Processing,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchInput {
    pub query: String,
    pub location: String,
}

impl SearchInput {
    pub fn new(query: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: location.into(),
        }
    }
}

/// Latest processed-result payload together with its displayed text.
///
/// `raw_text` is the pretty-printed form of `payload` whenever a payload is
/// present, and [`FETCH_FAILED_SENTINEL`] right after a failed fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessedSnapshot {
    payload: Option<Value>,
    raw_text: String,
}

impl ProcessedSnapshot {
    pub fn fetched(payload: Value) -> Self {
        let raw_text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        Self {
            payload: Some(payload),
            raw_text,
        }
    }

    pub fn failed() -> Self {
        Self {
            payload: None,
            raw_text: FETCH_FAILED_SENTINEL.to_string(),
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    input: SearchInput,
    phase: SearchPhase,
    active_search: Option<SearchId>,
    next_search_id: SearchId,
    search_message: Option<String>,
    snapshot: ProcessedSnapshot,
    error: Option<String>,
    dirty: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            input: SearchInput::default(),
            phase: SearchPhase::Idle,
            active_search: None,
            next_search_id: 1,
            search_message: None,
            snapshot: ProcessedSnapshot::default(),
            error: None,
            dirty: false,
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            query: self.input.query.clone(),
            location: self.input.location.clone(),
            phase: self.phase,
            active_search: self.active_search,
            search_message: self.search_message.clone(),
            payload: self.snapshot.payload().cloned(),
            raw_json: self.snapshot.raw_text().to_string(),
            error: self.error.clone(),
        }
    }

    pub fn input(&self) -> &SearchInput {
        &self.input
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn snapshot(&self) -> &ProcessedSnapshot {
        &self.snapshot
    }

    /// Returns whether anything observable changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn set_query(&mut self, query: String) {
        if self.input.query != query {
            self.input.query = query;
            self.dirty = true;
        }
    }

    pub(crate) fn set_location(&mut self, location: String) {
        if self.input.location != location {
            self.input.location = location;
            self.dirty = true;
        }
    }

    /// Clears the transient outcome of earlier attempts and makes a new attempt active.
    pub(crate) fn begin_search(&mut self, input: SearchInput) -> SearchId {
        let search_id = self.next_search_id;
        self.next_search_id += 1;
        self.input = input;
        self.active_search = Some(search_id);
        self.phase = SearchPhase::Searching;
        self.search_message = None;
        self.snapshot.payload = None;
        self.error = None;
        self.dirty = true;
        search_id
    }

    pub(crate) fn record_search_message(&mut self, message: String) {
        if self.search_message.as_deref() != Some(message.as_str()) {
            self.search_message = Some(message);
            self.dirty = true;
        }
    }

    pub(crate) fn set_error(&mut self, message: String) {
        if self.error.as_deref() != Some(message.as_str()) {
            self.error = Some(message);
            self.dirty = true;
        }
    }

    pub(crate) fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn set_snapshot(&mut self, snapshot: ProcessedSnapshot) {
        if self.snapshot != snapshot {
            self.snapshot = snapshot;
            self.dirty = true;
        }
    }

    /// Moves the phase forward, but only on behalf of the active attempt.
    pub(crate) fn advance(&mut self, search_id: SearchId, phase: SearchPhase) {
        if self.active_search != Some(search_id) {
            return;
        }
        if phase == SearchPhase::Idle {
            self.active_search = None;
        }
        if self.phase != phase {
            self.phase = phase;
            self.dirty = true;
        }
    }
}
