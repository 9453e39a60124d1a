//! Host server adaptation.
//!
//! # Responsibilities
//! - Turn a [`Dispatcher`] into an axum `Router`
//! - Buffer each request and hand it to the resolver
//! - Map dispatch failures to an HTTP response and journal them
//!
//! # Design Decisions
//! - Every method and path goes through one fallback handler
//! - Failures cannot abort the test from inside the server task, so they are
//!   answered with `failure_status` and surfaced later by [`Dispatcher::verify`]
//! - A panicking producer counts as a failed dispatch, not a dropped connection
//! - Only an oversized body gets 413; any other body read error gets 400

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::dispatch::{Dispatcher, MockResponses};
use crate::http::request::{is_body_too_large, RequestDescriptor};

/// Settings for the HTTP handler.
#[derive(Debug, Clone, Copy)]
pub struct HandlerConfig {
    /// Largest request body buffered for matching.
    pub max_body_bytes: usize,

    /// Status sent when a request cannot be dispatched.
    pub failure_status: StatusCode,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
            failure_status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Handler state injected by axum.
#[derive(Clone)]
struct AppState {
    dispatcher: Dispatcher,
    config: HandlerConfig,
}

impl Dispatcher {
    /// Router serving every request from this dispatcher.
    pub fn into_router(self) -> Router {
        self.router_with(HandlerConfig::default())
    }

    pub fn router_with(self, config: HandlerConfig) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(AppState {
                dispatcher: self,
                config,
            })
            .layer(TraceLayer::new_for_http())
    }
}

impl MockResponses {
    pub fn into_router(self) -> Router {
        self.into_dispatcher().into_router()
    }
}

async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let limit = state.config.max_body_bytes;
    let descriptor = match RequestDescriptor::from_request(request, limit).await {
        Ok(d) => d,
        Err(e) => {
            let status = if is_body_too_large(&e) {
                StatusCode::PAYLOAD_TOO_LARGE
            } else {
                StatusCode::BAD_REQUEST
            };
            tracing::warn!(error = %e, limit, status = %status, "Failed to read request body");
            state
                .dispatcher
                .record_unexpected(format!("Unreadable request body: {e}"));
            return (status, "Request body could not be read").into_response();
        }
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| state.dispatcher.resolve(&descriptor)));
    let message = match outcome {
        Ok(Ok(response)) => return response.into_response(),
        Ok(Err(e)) => e.to_string(),
        Err(payload) => format!(
            "Response producer panicked: {} ({})",
            panic_message(&*payload),
            descriptor.pretty()
        ),
    };

    tracing::error!(error = %message, "Request could not be dispatched");
    state.dispatcher.record_unexpected(message.clone());
    (state.config.failure_status, message).into_response()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::mock_responses;
    use crate::http::response::MockResponse;
    use tower::ServiceExt;

    async fn send(router: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_router_dispatches_in_order() {
        let dispatcher = mock_responses(|m| {
            m.match_body("body", || MockResponse::new().with_status(201));
            m.match_body("body", || MockResponse::new().with_body("second"));
            m.match_path("/api", || MockResponse::new().with_status(404));
        });
        let router = dispatcher.clone().into_router();

        assert_eq!(send(&router, "POST", "/", "body").await.0, StatusCode::CREATED);
        assert_eq!(
            send(&router, "POST", "/", "body").await,
            (StatusCode::OK, "second".to_string())
        );
        assert_eq!(send(&router, "GET", "/api/v2", "").await.0, StatusCode::NOT_FOUND);
        assert!(dispatcher.verify().is_ok());
    }

    #[tokio::test]
    async fn test_failure_is_answered_and_journaled() {
        let dispatcher = mock_responses(|m| {
            m.match_method("PUT", || MockResponse::new().with_status(403));
        });
        let router = dispatcher.clone().into_router();

        let (status, body) = send(&router, "GET", "/missing", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Unexpected request: GET:/missing -> ");

        assert_eq!(dispatcher.unexpected_requests(), vec![body]);
        assert!(dispatcher.verify().is_err());
    }

    #[tokio::test]
    async fn test_panicking_producer_is_answered_and_journaled() {
        let dispatcher = mock_responses(|m| {
            m.match_method("GET", || -> MockResponse { panic!("boom") });
            m.match_method("GET", || MockResponse::new().with_status(202));
        });
        let router = dispatcher.clone().into_router();

        let (status, body) = send(&router, "GET", "/", "").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Response producer panicked: boom (GET:/ -> )");
        assert_eq!(dispatcher.unexpected_requests(), vec![body]);
        assert!(dispatcher.verify().is_err());

        assert_eq!(send(&router, "GET", "/", "").await.0, StatusCode::ACCEPTED);
        assert!(dispatcher.is_drained());
    }

    #[tokio::test]
    async fn test_broken_body_is_bad_request() {
        let dispatcher = mock_responses(|m| {
            m.match_body("", || MockResponse::new());
        });
        let router = dispatcher.clone().into_router();

        let chunks: Vec<Result<&'static str, std::io::Error>> = vec![
            Ok("par"),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "aborted")),
        ];
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .unwrap();
        let response = router.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(dispatcher.remaining(), 1);
        assert_eq!(dispatcher.unexpected_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_failure_status_and_body_limit() {
        let dispatcher = mock_responses(|m| {
            m.match_body("", || MockResponse::new());
        });
        let router = dispatcher.clone().router_with(HandlerConfig {
            max_body_bytes: 4,
            failure_status: StatusCode::IM_A_TEAPOT,
        });

        let (status, _) = send(&router, "POST", "/", "far too long").await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(dispatcher.remaining(), 1);

        assert_eq!(send(&router, "POST", "/", "ok").await.0, StatusCode::OK);
        assert_eq!(send(&router, "POST", "/", "ok").await.0, StatusCode::IM_A_TEAPOT);
        assert_eq!(dispatcher.unexpected_requests().len(), 2);
    }
}
