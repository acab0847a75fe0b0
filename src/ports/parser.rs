// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! parsing configuration files in different formats into a nested value tree.

use crate::domain::{ConfigMap, Result};

/// A trait for parsing configuration files.
///
/// Unlike flat key-value formats, parsers keep the nesting of the document:
///
/// ```yaml
/// database:
///   host: localhost
///   port: 5432
/// ```
///
/// becomes a `database` mapping holding `host` and `port`. An empty document
/// parses into an empty mapping.
///
/// # Examples
///
/// ```rust
/// use schemacfg::domain::{ConfigMap, ConfigValue, Result};
/// use schemacfg::ports::ConfigParser;
///
/// struct KeyValueParser;
///
/// impl ConfigParser for KeyValueParser {
///     fn parse(&self, content: &str) -> Result<ConfigMap> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim().to_string(), ConfigValue::infer(v.trim())))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["kv"]
///     }
/// }
///
/// let parsed = KeyValueParser.parse("port = 80").unwrap();
/// assert_eq!(parsed.get("port"), Some(&ConfigValue::Integer(80)));
/// ```
pub trait ConfigParser {
    /// Parses configuration content into a nested mapping.
    fn parse(&self, content: &str) -> Result<ConfigMap>;

    /// Returns the file extensions supported by this parser, without the
    /// leading dot.
    fn supported_extensions(&self) -> &[&str];
}
