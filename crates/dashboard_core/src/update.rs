use serde_json::Value;

use crate::{
    DashboardState, Effect, Flow, Msg, ProcessedSnapshot, RequestFailure, SearchPhase,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: DashboardState, msg: Msg) -> (DashboardState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryChanged(query) => {
            state.set_query(query);
            Vec::new()
        }
        Msg::LocationChanged(location) => {
            state.set_location(location);
            Vec::new()
        }
        Msg::SearchSubmitted(input) => {
            // Re-entrant: an attempt already in flight keeps running, but the new one
            // owns the phase from here on.
            let search_id = state.begin_search(input.clone());
            vec![Effect::PostSearch { search_id, input }]
        }
        Msg::SearchResponded {
            search_id,
            input,
            message,
        } => {
            state.record_search_message(message);
            state.advance(search_id, SearchPhase::Processing);
            vec![Effect::PostProcess { search_id, input }]
        }
        Msg::SearchFailed { search_id, failure } => {
            state.set_error(failure.user_message(Flow::Search));
            state.advance(search_id, SearchPhase::Idle);
            Vec::new()
        }
        Msg::ProcessResponded { search_id } => {
            state.advance(search_id, SearchPhase::Idle);
            vec![Effect::RefreshSnapshot]
        }
        Msg::ProcessFailed { search_id, failure } => {
            // The search message stays visible even though the attempt failed here.
            state.set_error(failure.user_message(Flow::Search));
            state.advance(search_id, SearchPhase::Idle);
            Vec::new()
        }
        Msg::SnapshotReceived(payload) => {
            if is_blank(&payload) {
                apply_snapshot_failure(&mut state, &RequestFailure::invalid_response());
            } else {
                state.set_snapshot(ProcessedSnapshot::fetched(payload));
                state.clear_error();
            }
            Vec::new()
        }
        Msg::SnapshotFailed(failure) => {
            apply_snapshot_failure(&mut state, &failure);
            Vec::new()
        }
    };

    (state, effects)
}

fn apply_snapshot_failure(state: &mut DashboardState, failure: &RequestFailure) {
    state.set_error(failure.user_message(Flow::Fetch));
    state.set_snapshot(ProcessedSnapshot::failed());
}

/// A body that a JSON consumer would treat as "nothing there".
fn is_blank(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
