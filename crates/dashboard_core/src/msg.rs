use serde_json::Value;

use crate::{RequestFailure, SearchId, SearchInput};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the query text.
    QueryChanged(String),
    /// User edited the location text.
    LocationChanged(String),
    /// User asked for a search with the given input.
    SearchSubmitted(SearchInput),
    /// `/search` answered with its message.
    SearchResponded {
        search_id: SearchId,
        input: SearchInput,
        message: String,
    },
    /// `/search` failed.
    SearchFailed {
        search_id: SearchId,
        failure: RequestFailure,
    },
    /// `/process` answered; its body is ignored.
    ProcessResponded { search_id: SearchId },
    /// `/process` failed.
    ProcessFailed {
        search_id: SearchId,
        failure: RequestFailure,
    },
    /// `/api/results` answered with a body.
    SnapshotReceived(Value),
    /// `/api/results` failed.
    SnapshotFailed(RequestFailure),
}
