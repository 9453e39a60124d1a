//! Rule registry and configuration builder.
//!
//! # Responsibilities
//! - Store rules in registration order
//! - Merge registrations sharing a (value, kind) pair into one queue
//! - Find the first matching rule with queued responses
//!
//! # Design Decisions
//! - Rules are never removed, even once drained
//! - Linear scan: registration order is the only tie-break
//! - Lookups are side-effect free; only [`Rule::consume`] mutates a queue

use crate::dispatch::error::{DispatchError, DispatchResult};
use crate::dispatch::matcher::MatchKind;
use crate::dispatch::resolver::Dispatcher;
use crate::dispatch::rule::{producer, IntoMockResponse, Producer, Rule};
use crate::http::request::RequestDescriptor;

/// Ordered collection of rules.
#[derive(Debug, Default)]
pub struct Registry {
    rules: Vec<Rule>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `producer` to the queue of the (value, kind) rule, creating the
    /// rule at the end of the registration order if it does not exist yet.
    pub fn register(&mut self, value: impl Into<String>, kind: MatchKind, producer: Producer) {
        let value = value.into();
        match self.rules.iter_mut().find(|r| r.is(&value, kind)) {
            Some(rule) => {
                rule.push(producer);
                tracing::debug!(kind = %kind, value = %value, pending = rule.pending(), "Queued response");
            }
            None => {
                let mut rule = Rule::new(value, kind);
                rule.push(producer);
                tracing::debug!(kind = %kind, value = %rule.value(), position = self.rules.len(), "Registered rule");
                self.rules.push(rule);
            }
        }
    }

    /// Find the first rule, in registration order, whose predicate holds and
    /// whose queue is non-empty.
    ///
    /// Fails with [`DispatchError::Unmatched`] when no predicate holds and
    /// with [`DispatchError::Exhausted`] when every matching rule is drained.
    pub(crate) fn find_matching_non_empty_rule(
        &mut self,
        request: &RequestDescriptor,
    ) -> DispatchResult<&mut Rule> {
        let mut matched = false;
        let mut selected = None;
        for (index, rule) in self.rules.iter().enumerate() {
            if !rule.matches(request) {
                continue;
            }
            matched = true;
            if !rule.is_empty() {
                selected = Some(index);
                break;
            }
        }

        match selected {
            Some(index) => Ok(&mut self.rules[index]),
            None if matched => Err(DispatchError::Exhausted {
                request: request.pretty(),
            }),
            None => Err(DispatchError::Unmatched {
                request: request.pretty(),
            }),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Queued producers for the (value, kind) rule, if it was ever registered.
    pub fn pending(&self, value: &str, kind: MatchKind) -> Option<usize> {
        self.rules.iter().find(|r| r.is(value, kind)).map(Rule::pending)
    }

    /// Total producers still queued across all rules.
    pub fn remaining(&self) -> usize {
        self.rules.iter().map(Rule::pending).sum()
    }
}

/// Builder used to declare mock responses.
///
/// ```
/// use mock_dispatch::{mock_responses, MockResponse};
///
/// let dispatcher = mock_responses(|m| {
///     m.match_body("foo", || MockResponse::new().with_status(201));
///     m.match_path("bar", || MockResponse::new().with_body("baz"));
///     m.match_method("GET", || MockResponse::new().with_status(403));
/// });
/// assert_eq!(dispatcher.remaining(), 3);
/// ```
#[derive(Debug, Default)]
pub struct MockResponses {
    registry: Registry,
}

impl MockResponses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for requests whose body contains `value`.
    pub fn match_body<F, T>(&mut self, value: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce() -> T + Send + 'static,
        T: IntoMockResponse,
    {
        self.add_rule(value, MatchKind::Body, f)
    }

    /// Queue a response for requests whose path contains `value`.
    pub fn match_path<F, T>(&mut self, value: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce() -> T + Send + 'static,
        T: IntoMockResponse,
    {
        self.add_rule(value, MatchKind::Path, f)
    }

    /// Queue a response for requests whose method contains `value`.
    pub fn match_method<F, T>(&mut self, value: impl Into<String>, f: F) -> &mut Self
    where
        F: FnOnce() -> T + Send + 'static,
        T: IntoMockResponse,
    {
        self.add_rule(value, MatchKind::Method, f)
    }

    pub fn add_rule<F, T>(&mut self, value: impl Into<String>, kind: MatchKind, f: F) -> &mut Self
    where
        F: FnOnce() -> T + Send + 'static,
        T: IntoMockResponse,
    {
        self.registry.register(value, kind, producer(f));
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn into_registry(self) -> Registry {
        self.registry
    }

    pub fn into_dispatcher(self) -> Dispatcher {
        Dispatcher::new(self.registry)
    }
}

/// Declare mock responses and convert them into a [`Dispatcher`].
pub fn mock_responses<F>(init: F) -> Dispatcher
where
    F: FnOnce(&mut MockResponses),
{
    let mut responses = MockResponses::new();
    init(&mut responses);
    responses.into_dispatcher()
}
