//! Dispatch error definitions.

use thiserror::Error;

/// Boxed error returned by fallible response producers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving a request to a response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No registered rule matched the request.
    #[error("Unexpected request: {request}")]
    Unmatched { request: String },

    /// Rules matched the request but none had a queued response left.
    #[error("Empty response queue: {request}")]
    Exhausted { request: String },

    /// The response producer itself failed.
    #[error(transparent)]
    Producer(BoxError),

    /// Responses were registered but never consumed.
    #[error("Unconsumed responses: {}", pending.join(", "))]
    Unconsumed { pending: Vec<String> },

    /// Requests served over HTTP failed to dispatch.
    #[error("Unexpected requests were served: {}", requests.join("; "))]
    UnexpectedRequests { requests: Vec<String> },
}

impl DispatchError {
    /// Returns true for the two "no usable match" failures.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::Unmatched { .. } | Self::Exhausted { .. })
    }

    /// Recover the original producer error, if this is one.
    pub fn into_producer_error(self) -> Option<BoxError> {
        match self {
            Self::Producer(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
