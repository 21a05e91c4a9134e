use dashboard_core::RequestFailure;
use thiserror::Error;

/// Transport failures, classified in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// A response arrived with a non-success status.
    #[error("server responded with status {status}: {}", .message.as_deref().unwrap_or("no error text"))]
    Server { status: u16, message: Option<String> },
    /// The request was sent but no response was observed.
    #[error("no response received: {0}")]
    NoResponse(String),
    /// The request could not be built or dispatched.
    #[error("request setup failed: {0}")]
    RequestSetup(String),
}

impl TransportError {
    pub(crate) fn setup(message: impl Into<String>) -> Self {
        Self::RequestSetup(message.into())
    }
}

impl From<TransportError> for RequestFailure {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Server { status, message } => RequestFailure::Server { status, message },
            // Transport detail goes to the log; the banner text is fixed.
            TransportError::NoResponse(_) => RequestFailure::NoResponse,
            TransportError::RequestSetup(message) => RequestFailure::RequestSetup { message },
        }
    }
}
