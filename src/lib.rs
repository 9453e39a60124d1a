//! Request matching and response sequencing for HTTP test doubles.
//!
//! Rules pair a substring with the request field it is tested against
//! (body, path or method). Each rule owns a FIFO of deferred responses;
//! every incoming request is answered by the next response of the first
//! registered rule that matches and still has one.
//!
//! ```
//! use mock_dispatch::{mock_responses, MockResponse, RequestDescriptor};
//!
//! let dispatcher = mock_responses(|m| {
//!     m.match_body("body", || MockResponse::new().with_status(201));
//!     m.match_body("body", || MockResponse::new().with_status(200));
//!     m.match_path("/api", || MockResponse::new().with_status(404));
//!     m.match_method("PUT", || MockResponse::new().with_status(403));
//! });
//!
//! let post = RequestDescriptor::new("POST", "/", "body");
//! assert_eq!(dispatcher.resolve(&post).unwrap().status(), 201);
//! assert_eq!(dispatcher.resolve(&post).unwrap().status(), 200);
//! assert!(dispatcher.resolve(&post).is_err());
//!
//! // Serve it from any axum-compatible host:
//! let _router: axum::Router = dispatcher.into_router();
//! ```

pub mod config;
pub mod dispatch;
pub mod http;
pub mod observability;

pub use dispatch::{mock_responses, DispatchError, Dispatcher, MatchKind, MockResponses};
pub use http::{HandlerConfig, MockResponse, RequestDescriptor};
