//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatch / http subsystems produce:
//!     → tracing events (registration, dispatch, failures)
//!     → metrics.rs (request counters by outcome)
//!
//! Consumers:
//!     → logging.rs subscriber (binary only)
//!     → whatever metrics recorder the host installs
//! ```

pub mod logging;
pub mod metrics;
