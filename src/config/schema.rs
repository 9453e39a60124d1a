//! Fixture schema definitions.
//!
//! A fixture file declares handler settings and an ordered list of rules,
//! each with the response it should produce. All types derive Serde traits
//! for deserialization from TOML.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::dispatch::{MatchKind, MockResponses};
use crate::http::handler::HandlerConfig;
use crate::http::response::MockResponse;

/// Root fixture configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FixtureConfig {
    /// Server and handler settings.
    pub server: ServerConfig,

    /// Rules, in registration order.
    pub rules: Vec<RuleConfig>,
}

/// Server and handler settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Largest request body buffered for matching.
    pub max_body_bytes: usize,

    /// Status sent when a request cannot be dispatched.
    pub failure_status: u16,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
            failure_status: 500,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Handler settings; an invalid failure status falls back to 500.
    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig {
            max_body_bytes: self.max_body_bytes,
            failure_status: StatusCode::from_u16(self.failure_status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

/// One queued response for a (kind, value) rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Field the value is tested against.
    pub kind: MatchKind,

    /// Substring to look for.
    pub value: String,

    /// Response produced when this entry is consumed.
    #[serde(default)]
    pub response: ResponseConfig,
}

/// Canned response definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseConfig {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            status: 200,
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }
}

impl ResponseConfig {
    pub fn to_response(&self) -> MockResponse {
        self.headers.iter().fold(
            MockResponse::new()
                .with_status(self.status)
                .with_body(self.body.clone()),
            |response, (name, value)| response.with_header(name.as_str(), value.as_str()),
        )
    }
}

impl FixtureConfig {
    /// Register every rule in file order.
    pub fn to_responses(&self) -> MockResponses {
        let mut responses = MockResponses::new();
        for rule in &self.rules {
            let response = rule.response.to_response();
            responses.add_rule(rule.value.as_str(), rule.kind, move || response);
        }
        responses
    }
}
