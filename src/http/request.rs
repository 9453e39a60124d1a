//! Request descriptors.
//!
//! # Responsibilities
//! - Expose the three matchable fields of a request (method, path, body)
//! - Buffer an axum request body into text
//! - Render the diagnostic used in dispatch errors
//!
//! # Design Decisions
//! - Body is fully materialized before matching, never streamed
//! - Path keeps the query string, as a raw request line would
//! - Non-UTF-8 bodies are decoded lossily

use axum::body::{to_bytes, Body};
use axum::http::Request;
use http_body_util::LengthLimitError;

/// Read-only view of an incoming request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: String,
    path: String,
    body: String,
}

impl RequestDescriptor {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body: body.into(),
        }
    }

    /// Buffer `request` into a descriptor, reading at most `limit` body bytes.
    pub async fn from_request(request: Request<Body>, limit: usize) -> Result<Self, axum::Error> {
        let (parts, body) = request.into_parts();
        let path = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        let bytes = to_bytes(body, limit).await?;

        Ok(Self {
            method: parts.method.to_string(),
            path,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// `METHOD:PATH -> BODY`
    pub fn pretty(&self) -> String {
        format!("{}:{} -> {}", self.method, self.path, self.body)
    }
}

/// Returns true if `error` came from the body exceeding its read limit.
pub fn is_body_too_large(error: &axum::Error) -> bool {
    let mut source = std::error::Error::source(error);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_request() {
        let req = Request::builder()
            .method("POST")
            .uri("http://example.com/api/v1?x=1")
            .body(Body::from("hello"))
            .unwrap();

        let desc = RequestDescriptor::from_request(req, 1024).await.unwrap();
        assert_eq!(desc.method(), "POST");
        assert_eq!(desc.path(), "/api/v1?x=1");
        assert_eq!(desc.body(), "hello");
        assert_eq!(desc.pretty(), "POST:/api/v1?x=1 -> hello");
    }

    #[tokio::test]
    async fn test_body_limit() {
        let req = Request::builder()
            .uri("/")
            .body(Body::from(vec![b'a'; 64]))
            .unwrap();

        let err = RequestDescriptor::from_request(req, 16).await.unwrap_err();
        assert!(is_body_too_large(&err));
    }

    #[tokio::test]
    async fn test_stream_error_is_not_a_limit_error() {
        let chunks: Vec<Result<&'static str, std::io::Error>> = vec![
            Ok("par"),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "aborted")),
        ];
        let req = Request::builder()
            .uri("/")
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .unwrap();

        let err = RequestDescriptor::from_request(req, 1024).await.unwrap_err();
        assert!(!is_body_too_large(&err));
    }

    #[tokio::test]
    async fn test_lossy_body() {
        let req = Request::builder()
            .uri("/")
            .body(Body::from(vec![b'o', b'k', 0xff]))
            .unwrap();

        let desc = RequestDescriptor::from_request(req, 16).await.unwrap();
        assert!(desc.body().starts_with("ok"));
    }
}
