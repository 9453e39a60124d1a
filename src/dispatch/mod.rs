//! Request matching and response sequencing.
//!
//! # Data Flow
//! ```text
//! Configuration (at test setup):
//!     MockResponses::match_body / match_path / match_method
//!     → registry.rs (merge into (value, kind) rules, keep order)
//!     → Dispatcher (shared, lock-guarded)
//!
//! Incoming request:
//!     RequestDescriptor (method, path, body)
//!     → resolver.rs (lock registry)
//!     → matcher.rs (substring predicate per rule)
//!     → rule.rs (pop head producer, invoke)
//!     → Return: MockResponse or DispatchError
//! ```
//!
//! # Design Decisions
//! - First registered matching rule with queued responses wins
//! - Queues only shrink; rules are never removed
//! - "No rule" and "rule drained" are distinct errors

pub mod error;
pub mod matcher;
pub mod registry;
pub mod resolver;
pub mod rule;

pub use error::{BoxError, DispatchError, DispatchResult};
pub use matcher::MatchKind;
pub use registry::{mock_responses, MockResponses, Registry};
pub use resolver::Dispatcher;
pub use rule::{producer, IntoMockResponse, Producer, Rule};
