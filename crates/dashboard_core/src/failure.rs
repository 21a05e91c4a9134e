/// Shown for every request that was sent but never answered.
pub const NO_RESPONSE_MESSAGE: &str = "No response received from the server. Please try again.";
/// Used when a failure response carries no `error` text.
pub const GENERIC_SERVER_MESSAGE: &str = "An unexpected error occurred";
/// Used when a success response lacks the body the client needs.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server";

/// Unified failure taxonomy shared by the search and snapshot flows.
///
/// Variants are mutually exclusive and classified in declaration order: a
/// received failure status always wins over transport-level problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    /// A response arrived with a non-success status.
    Server { status: u16, message: Option<String> },
    /// The request went out but nothing came back (timeout, refused, reset).
    NoResponse,
    /// The request could not be built or dispatched.
    RequestSetup { message: String },
}

/// Which flow a failure is reported for; only the server wording differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Search,
    Fetch,
}

impl RequestFailure {
    pub fn invalid_response() -> Self {
        Self::RequestSetup {
            message: INVALID_RESPONSE_MESSAGE.to_string(),
        }
    }

    /// Text for the single error banner.
    pub fn user_message(&self, flow: Flow) -> String {
        match self {
            Self::Server { message, .. } => {
                let detail = message.as_deref().unwrap_or(GENERIC_SERVER_MESSAGE);
                match flow {
                    Flow::Search => format!("Error: {detail}"),
                    Flow::Fetch => format!("Failed to fetch results. Error: {detail}"),
                }
            }
            Self::NoResponse => NO_RESPONSE_MESSAGE.to_string(),
            Self::RequestSetup { message } => format!("Error: {message}"),
        }
    }
}
