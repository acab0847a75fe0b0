// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and contracts.
//!
//! This module contains the path, value and error types shared by every other
//! layer, together with the traits describing the public configuration API.

pub mod config_key;
pub mod config_value;
pub mod errors;
pub mod service;

// Re-export commonly used types
pub use config_key::ConfigKey;
pub use config_value::{ConfigMap, ConfigValue};
pub use errors::{ConfigError, Result, ValidationMessage};
pub use service::{ConfigurationReader, MutableConfiguration, SchemaBuilder};
