// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hierarchical configuration store with per-namespace schemas.
//!
//! Raw configuration values are collected from code, YAML files, environment
//! variables and command-line arguments. Each top-level key (a *namespace*)
//! is validated and normalized by its own schema, lazily, the first time any
//! path inside it is read. Validated namespaces and resolved paths are cached
//! until the next mutation.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and contracts (`ConfigKey`, `ConfigValue`, errors,
//!   `ConfigurationReader`)
//! - **Ports**: Trait definitions that define interfaces (`Schema`, `ConfigSource`)
//! - **Adapters**: The `Expect` schema and the raw value sources (env vars, YAML, CLI)
//! - **Service**: The configuration store that orchestrates everything
//!
//! # Paths
//!
//! Paths use `.` or `/` as separators, interchangeably: `db.pool.size`,
//! `db/pool/size` and `db/pool.size` all address the same item. The first segment names the
//! namespace whose schema governs the path.
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `env`: Enable environment variable support (default)
//! - `cli`: Enable command-line argument support (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use schemacfg::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut config = Configuration::new();
//! config.add_schema(
//!     "db",
//!     Expect::structure([
//!         ("host", Expect::string().required()),
//!         ("port", Expect::int().default(5432)),
//!     ]),
//! );
//! config.set("db.host", "x")?;
//!
//! assert_eq!(config.get("db.port")?, ConfigValue::Integer(5432));
//! assert!(config.exists("db/host")?);
//!
//! // Components that only read get a view without mutators
//! let reader = config.reader();
//! assert_eq!(reader.get("db.host")?.as_str("db.host")?, "x");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::Expect;
    pub use crate::domain::{
        ConfigError, ConfigKey, ConfigMap, ConfigValue, ConfigurationReader,
        MutableConfiguration, Result, SchemaBuilder, ValidationMessage,
    };
    pub use crate::ports::{ConfigParser, ConfigSource, Schema};
    pub use crate::service::{Configuration, ConfigurationBuilder, ReadOnlyConfiguration};

    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::CommandLineAdapter;
    #[cfg(feature = "env")]
    pub use crate::adapters::EnvVarAdapter;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::{YamlFileAdapter, YamlParser};
}
