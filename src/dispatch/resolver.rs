//! Request resolution.
//!
//! # Responsibilities
//! - Select the rule for an incoming request
//! - Dequeue and invoke its next producer
//! - Journal failed HTTP dispatches for later verification
//!
//! # Design Decisions
//! - One lock held across find → pop → invoke, so concurrent requests
//!   observe strict FIFO per rule
//! - Failed lookups leave every queue untouched
//! - A poisoned lock is recovered: the pop precedes the invoke, so a
//!   panicking producer cannot leave a half-consumed slot behind

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dispatch::error::{DispatchError, DispatchResult};
use crate::dispatch::registry::Registry;
use crate::http::request::RequestDescriptor;
use crate::http::response::MockResponse;
use crate::observability::metrics;

/// Shared, lock-guarded resolver over a [`Registry`].
///
/// Clones share the same registry and journal.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    registry: Arc<Mutex<Registry>>,
    unexpected: Arc<Mutex<Vec<String>>>,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
            unexpected: Arc::default(),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn journal(&self) -> MutexGuard<'_, Vec<String>> {
        self.unexpected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolve `request` to the next queued response of the first matching
    /// rule that still has one.
    pub fn resolve(&self, request: &RequestDescriptor) -> DispatchResult<MockResponse> {
        let mut registry = self.registry();
        let rule = match registry.find_matching_non_empty_rule(request) {
            Ok(rule) => rule,
            Err(e) => {
                tracing::warn!(error = %e, "No usable rule for request");
                metrics::record_dispatch(&e);
                return Err(e);
            }
        };

        let kind = rule.kind();
        let value = rule.value().to_string();
        let result = rule.consume(request);
        let remaining = rule.pending();
        drop(registry);

        match &result {
            Ok(response) => {
                tracing::debug!(
                    kind = %kind,
                    value = %value,
                    status = response.status(),
                    remaining,
                    "Dispatched mock response"
                );
                metrics::record_served(kind);
            }
            Err(e) => {
                tracing::error!(kind = %kind, value = %value, error = %e, "Response producer failed");
                metrics::record_dispatch(e);
            }
        }
        result
    }

    /// Record a failure that was turned into an HTTP response rather than
    /// surfaced to the caller.
    pub(crate) fn record_unexpected(&self, message: String) {
        self.journal().push(message);
    }

    /// Failures recorded by the HTTP handler, oldest first.
    ///
    /// The journal keeps growing for the lifetime of the dispatcher; use
    /// [`take_unexpected_requests`](Self::take_unexpected_requests) to drain it.
    pub fn unexpected_requests(&self) -> Vec<String> {
        self.journal().clone()
    }

    /// Drain the failure journal, returning what it held.
    pub fn take_unexpected_requests(&self) -> Vec<String> {
        std::mem::take(&mut *self.journal())
    }

    /// Total producers still queued across all rules.
    pub fn remaining(&self) -> usize {
        self.registry().remaining()
    }

    pub fn is_drained(&self) -> bool {
        self.remaining() == 0
    }

    /// Check that every request was served and every response consumed.
    pub fn verify(&self) -> DispatchResult<()> {
        let requests = self.unexpected_requests();
        if !requests.is_empty() {
            return Err(DispatchError::UnexpectedRequests { requests });
        }

        let pending: Vec<String> = self
            .registry()
            .rules()
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| format!("{}:{} ({} pending)", r.kind(), r.value(), r.pending()))
            .collect();
        if pending.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::Unconsumed { pending })
        }
    }
}
