//! Fixture validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate status codes, header names and values, limits, bind address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FixtureConfig → Result<(), Vec<ValidationError>>
//! - Empty rule values are allowed (they match every request)

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use thiserror::Error;

use crate::config::schema::FixtureConfig;

/// A single semantic problem in a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("invalid failure status {0}")]
    FailureStatus(u16),

    #[error("rule {index}: invalid status {status}")]
    Status { index: usize, status: u16 },

    #[error("rule {index}: invalid header '{name}'")]
    Header { index: usize, name: String },
}

pub fn validate_config(config: &FixtureConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.server.bind_address.clone()));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }
    if StatusCode::from_u16(config.server.failure_status).is_err() {
        errors.push(ValidationError::FailureStatus(config.server.failure_status));
    }

    for (index, rule) in config.rules.iter().enumerate() {
        let status = rule.response.status;
        if StatusCode::from_u16(status).is_err() {
            errors.push(ValidationError::Status { index, status });
        }
        for (name, value) in &rule.response.headers {
            if HeaderName::try_from(name.as_str()).is_err()
                || HeaderValue::try_from(value.as_str()).is_err()
            {
                errors.push(ValidationError::Header {
                    index,
                    name: name.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
