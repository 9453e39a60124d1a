//! Fixture configuration subsystem.
//!
//! # Data Flow
//! ```text
//! fixture file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FixtureConfig (validated, immutable)
//!     → MockResponses (rules registered in file order)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults except a rule's kind and value
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{FixtureConfig, ResponseConfig, RuleConfig, ServerConfig};
