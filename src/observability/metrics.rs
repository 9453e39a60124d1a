//! Dispatch metrics.
//!
//! # Metrics
//! - `mock_dispatch_requests_total` (counter): requests by outcome and rule kind
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no exporter is installed here,
//!   so updates are no-ops unless the host installs a recorder

use metrics::counter;

use crate::dispatch::{DispatchError, MatchKind};

pub const REQUESTS_TOTAL: &str = "mock_dispatch_requests_total";

/// Record a request answered from a rule of `kind`.
pub fn record_served(kind: MatchKind) {
    counter!(REQUESTS_TOTAL, "outcome" => "served", "kind" => kind.as_str()).increment(1);
}

/// Record a failed dispatch.
pub fn record_dispatch(error: &DispatchError) {
    counter!(REQUESTS_TOTAL, "outcome" => outcome(error)).increment(1);
}

fn outcome(error: &DispatchError) -> &'static str {
    match error {
        DispatchError::Unmatched { .. } => "unmatched",
        DispatchError::Exhausted { .. } => "exhausted",
        DispatchError::Producer(_) => "producer_error",
        DispatchError::Unconsumed { .. } | DispatchError::UnexpectedRequests { .. } => "verify",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        let err = DispatchError::Exhausted { request: String::new() };
        assert_eq!(outcome(&err), "exhausted");

        let err = DispatchError::Unmatched { request: String::new() };
        assert_eq!(outcome(&err), "unmatched");

        // No recorder installed: must not panic.
        record_dispatch(&err);
        record_served(MatchKind::Path);
    }
}
