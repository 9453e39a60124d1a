//! Rules and their response queues.
//!
//! # Responsibilities
//! - Hold the (value, kind) identity of a rule
//! - Own the FIFO of deferred response producers
//!
//! # Design Decisions
//! - Producers are `FnOnce`: each queue slot is invoked at most once
//! - A producer may return a bare response or a `Result`; both are boxed
//!   behind the same [`Producer`] shape

use std::collections::VecDeque;
use std::fmt;

use crate::dispatch::error::{BoxError, DispatchError, DispatchResult};
use crate::dispatch::matcher::MatchKind;
use crate::http::request::RequestDescriptor;
use crate::http::response::MockResponse;

/// Conversion of a producer's return value into a dispatch outcome.
pub trait IntoMockResponse {
    fn into_mock_response(self) -> Result<MockResponse, BoxError>;
}

impl IntoMockResponse for MockResponse {
    fn into_mock_response(self) -> Result<MockResponse, BoxError> {
        Ok(self)
    }
}

impl<E> IntoMockResponse for Result<MockResponse, E>
where
    E: Into<BoxError>,
{
    fn into_mock_response(self) -> Result<MockResponse, BoxError> {
        self.map_err(Into::into)
    }
}

/// A deferred response, built only when its queue slot is consumed.
pub type Producer = Box<dyn FnOnce() -> Result<MockResponse, BoxError> + Send>;

/// Box a closure into a [`Producer`].
pub fn producer<F, T>(f: F) -> Producer
where
    F: FnOnce() -> T + Send + 'static,
    T: IntoMockResponse,
{
    Box::new(move || f().into_mock_response())
}

/// A matching rule with its pending responses.
pub struct Rule {
    value: String,
    kind: MatchKind,
    producers: VecDeque<Producer>,
}

impl Rule {
    pub fn new(value: impl Into<String>, kind: MatchKind) -> Self {
        Self {
            value: value.into(),
            kind,
            producers: VecDeque::new(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> MatchKind {
        self.kind
    }

    /// Returns true if this rule identifies as (value, kind).
    pub fn is(&self, value: &str, kind: MatchKind) -> bool {
        self.kind == kind && self.value == value
    }

    /// Returns true if the rule's predicate holds for the request,
    /// regardless of queued responses.
    pub fn matches(&self, request: &RequestDescriptor) -> bool {
        self.kind.matches(&self.value, request)
    }

    pub fn push(&mut self, producer: Producer) {
        self.producers.push_back(producer);
    }

    pub fn pending(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    /// Dequeue the head producer and invoke it.
    ///
    /// The slot is consumed even when the producer fails.
    pub fn consume(&mut self, request: &RequestDescriptor) -> DispatchResult<MockResponse> {
        let producer = self
            .producers
            .pop_front()
            .ok_or_else(|| DispatchError::Exhausted {
                request: request.pretty(),
            })?;
        producer().map_err(DispatchError::Producer)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("value", &self.value)
            .field("kind", &self.kind)
            .field("pending", &self.producers.len())
            .finish()
    }
}
