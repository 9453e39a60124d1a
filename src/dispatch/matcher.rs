//! Rule predicates.
//!
//! # Responsibilities
//! - Name the request field a rule is tested against (body, path, method)
//! - Evaluate substring containment of a rule value in that field
//!
//! # Design Decisions
//! - Containment is case-sensitive and unanchored
//! - Empty value = always matches (wildcard)
//! - One predicate shape for all three fields; no regex, no exact mode

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::request::RequestDescriptor;

/// Which field of a request a rule value is tested against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Request body, fully read as text.
    Body,
    /// Request path as reported by the host server.
    Path,
    /// HTTP method.
    Method,
}

impl MatchKind {
    /// Select the field of `request` this kind inspects.
    pub fn field<'a>(&self, request: &'a RequestDescriptor) -> &'a str {
        match self {
            MatchKind::Body => request.body(),
            MatchKind::Path => request.path(),
            MatchKind::Method => request.method(),
        }
    }

    /// Returns true if `value` occurs anywhere in the field this kind inspects.
    pub fn matches(&self, value: &str, request: &RequestDescriptor) -> bool {
        self.field(request).contains(value)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Body => "body",
            MatchKind::Path => "path",
            MatchKind::Method => "method",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
