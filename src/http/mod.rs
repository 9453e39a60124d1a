//! HTTP adaptation subsystem.
//!
//! # Data Flow
//! ```text
//! axum Request
//!     → handler.rs (single fallback route)
//!     → request.rs (buffer body, build RequestDescriptor)
//!     → [dispatch::Dispatcher resolves]
//!     → response.rs (MockResponse → axum Response)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;

pub use handler::HandlerConfig;
pub use request::RequestDescriptor;
pub use response::MockResponse;
