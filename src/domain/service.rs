// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definitions.
//!
//! The public API is split by capability so that consumers can be handed only
//! what they need: [`ConfigurationReader`] for reading, [`MutableConfiguration`]
//! for supplying raw values, and [`SchemaBuilder`] for registering schemas.

use crate::domain::{ConfigMap, ConfigValue, Result};
use crate::ports::Schema;

/// Read access to validated configuration.
///
/// This trait is object safe, so consumers can accept a
/// `&dyn ConfigurationReader` without knowing whether they were given the
/// full store or a read-only view of it.
///
/// # Examples
///
/// ```rust
/// use schemacfg::domain::{ConfigError, ConfigValue, ConfigurationReader, Result};
///
/// struct Fixed;
///
/// impl ConfigurationReader for Fixed {
///     fn get(&self, key: &str) -> Result<ConfigValue> {
///         match key {
///             "app.name" => Ok(ConfigValue::from("svc")),
///             _ => Err(ConfigError::unknown_option(key, "unknown")),
///         }
///     }
///
///     fn exists(&self, key: &str) -> Result<bool> {
///         Ok(key == "app.name")
///     }
/// }
///
/// let reader: &dyn ConfigurationReader = &Fixed;
/// assert_eq!(reader.get("app.name").unwrap(), ConfigValue::from("svc"));
/// assert!(!reader.exists("app.port").unwrap());
/// ```
pub trait ConfigurationReader {
    /// Retrieves the validated value at the given dot- or slash-delimited path.
    ///
    /// # Errors
    ///
    /// * `ConfigError::UnknownOption` - The path is empty or malformed, its
    ///   namespace has no schema, or nothing exists at the path
    /// * `ConfigError::ValidationFailed` - The namespace failed validation
    fn get(&self, key: &str) -> Result<ConfigValue>;

    /// Checks whether a validated value exists at the given path.
    ///
    /// Unknown paths yield `Ok(false)`. Validation failures are still
    /// returned as errors.
    fn exists(&self, key: &str) -> Result<bool>;
}

/// Write access to the raw, unvalidated configuration values.
pub trait MutableConfiguration {
    /// Writes `value` at `key`, creating intermediate mappings as needed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownOption` if the path is malformed or one of
    /// its ancestors already holds a non-mapping value.
    fn set<V: Into<ConfigValue>>(&mut self, key: &str, value: V) -> Result<()>;

    /// Deep-merges `config` into the raw values. Incoming scalars replace
    /// existing ones, mappings are merged recursively.
    fn merge(&mut self, config: ConfigMap);
}

/// Registration of per-namespace schemas.
pub trait SchemaBuilder {
    /// Associates `schema` with the top-level `namespace`, replacing any
    /// schema previously registered for it.
    fn add_schema<S: Schema + 'static>(&mut self, namespace: &str, schema: S);
}
