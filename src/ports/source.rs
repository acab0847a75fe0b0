// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! This module defines the `ConfigSource` trait, the port through which raw,
//! unvalidated values enter the store. Any provider of user configuration
//! (environment variables, files, command-line arguments, ...) implements it.

use crate::domain::{ConfigMap, Result};

/// A provider of raw configuration values.
///
/// # Priority
///
/// Each source has a priority value (0-255). When several sources are merged
/// into one store, they are applied from the lowest priority to the highest,
/// so values from higher priority sources win. The typical priority values are:
///
/// - **3 (highest)**: Command-line arguments
/// - **2**: Environment variables
/// - **1 (lowest)**: Configuration files
///
/// # Examples
///
/// ```rust
/// use schemacfg::domain::{ConfigMap, ConfigValue, Result};
/// use schemacfg::ports::ConfigSource;
///
/// struct Defaults;
///
/// impl ConfigSource for Defaults {
///     fn name(&self) -> &str {
///         "defaults"
///     }
///
///     fn priority(&self) -> u8 {
///         0
///     }
///
///     fn load(&self) -> Result<ConfigMap> {
///         let mut map = ConfigMap::new();
///         map.insert("app".to_string(), ConfigValue::mapping([("name", "svc".into())]));
///         Ok(map)
///     }
/// }
///
/// assert_eq!(Defaults.load().unwrap().len(), 1);
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this configuration source.
    ///
    /// This name is used for logging, error messages, and debugging. It should be
    /// a short, descriptive identifier like "env", "yaml-file", "cli", etc.
    fn name(&self) -> &str;

    /// Returns the priority of this configuration source.
    fn priority(&self) -> u8;

    /// Returns the values provided by this source as a nested tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying data cannot be read or parsed.
    fn load(&self) -> Result<ConfigMap>;
}
