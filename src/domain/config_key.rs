// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration key newtype and path resolution.
//!
//! This module provides the `ConfigKey` type, which wraps a dot- or
//! slash-delimited configuration path and knows how to split it into
//! segments and extract its top-level namespace.

use crate::domain::errors::{ConfigError, Result};
use std::fmt;

/// Separators accepted between path segments.
pub const SEPARATORS: [char; 2] = ['.', '/'];

/// A type-safe wrapper for configuration paths.
///
/// `a.b.c`, `a/b/c` and mixed forms such as `a/b.c` all address the same
/// item. The key keeps the string exactly as given so that it can be used as
/// a cache key; normalization only happens when segments are requested.
///
/// # Examples
///
/// ```
/// use schemacfg::domain::config_key::ConfigKey;
///
/// let key = ConfigKey::from("database/pool.size");
/// assert_eq!(key.as_str(), "database/pool.size");
/// assert_eq!(key.normalized(), "database.pool.size");
/// assert_eq!(key.top_level_key().unwrap(), "database");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Creates a new `ConfigKey` from a `String`.
    pub fn new(key: String) -> Self {
        ConfigKey(key)
    }

    /// Returns the key exactly as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigKey` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if the key is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the key with every separator replaced by `.`.
    pub fn normalized(&self) -> String {
        self.0.replace(SEPARATORS, ".")
    }

    /// Extracts the top-level namespace of the key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownOption` if the key is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemacfg::domain::config_key::ConfigKey;
    ///
    /// assert_eq!(ConfigKey::from("a.b.c").top_level_key().unwrap(), "a");
    /// assert_eq!(ConfigKey::from("a/b/c").top_level_key().unwrap(), "a");
    /// assert_eq!(ConfigKey::from("a").top_level_key().unwrap(), "a");
    /// assert!(ConfigKey::from("").top_level_key().is_err());
    /// ```
    pub fn top_level_key(&self) -> Result<&str> {
        if self.0.is_empty() {
            return Err(ConfigError::unknown_option(
                "",
                "Path cannot be an empty string",
            ));
        }

        Ok(match self.0.find(SEPARATORS) {
            Some(index) => &self.0[..index],
            None => &self.0,
        })
    }

    /// Splits the key into its segments.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownOption` if the key is empty or contains an
    /// empty segment (`a..b`, `.a`, `a/`).
    ///
    /// # Examples
    ///
    /// ```
    /// use schemacfg::domain::config_key::ConfigKey;
    ///
    /// let key = ConfigKey::from("server/tls.cert");
    /// assert_eq!(key.segments().unwrap(), vec!["server", "tls", "cert"]);
    /// assert!(ConfigKey::from("server..cert").segments().is_err());
    /// ```
    pub fn segments(&self) -> Result<Vec<&str>> {
        if self.0.is_empty() {
            return Err(ConfigError::unknown_option(
                "",
                "Path cannot be an empty string",
            ));
        }

        let segments: Vec<&str> = self.0.split(SEPARATORS).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(ConfigError::unknown_option(
                self.0.clone(),
                format!("Path \"{}\" contains an empty segment", self.0),
            ));
        }
        Ok(segments)
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        ConfigKey(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        ConfigKey(s.to_string())
    }
}

impl From<&String> for ConfigKey {
    fn from(s: &String) -> Self {
        ConfigKey(s.clone())
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ConfigKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_key_from_str() {
        let key = ConfigKey::from("test.key");
        assert_eq!(key.as_str(), "test.key");
        assert_eq!(key.clone().into_string(), "test.key");
        let s: String = key.into();
        assert_eq!(s, "test.key");
    }

    #[test]
    fn test_config_key_display() {
        let key = ConfigKey::from("test/key");
        assert_eq!(format!("{}", key), "test/key");
    }

    #[test]
    fn test_config_key_hash_keeps_raw_form() {
        let mut map = HashMap::new();
        map.insert(ConfigKey::from("a.b"), 1);

        assert_eq!(map.get(&ConfigKey::from("a.b")), Some(&1));
        assert_eq!(map.get(&ConfigKey::from("a/b")), None);
    }

    #[test]
    fn test_top_level_key_without_separator() {
        assert_eq!(ConfigKey::from("app").top_level_key().unwrap(), "app");
    }

    #[test]
    fn test_top_level_key_mixed_separators() {
        assert_eq!(ConfigKey::from("app/db.host").top_level_key().unwrap(), "app");
        assert_eq!(ConfigKey::from("app.db/host").top_level_key().unwrap(), "app");
    }

    #[test]
    fn test_top_level_key_empty() {
        let err = ConfigKey::from("").top_level_key().unwrap_err();
        assert!(err.is_unknown_option());
        assert_eq!(err.path(), Some(""));
    }

    #[test]
    fn test_top_level_key_leading_separator() {
        assert_eq!(ConfigKey::from(".app").top_level_key().unwrap(), "");
    }

    #[test]
    fn test_normalized() {
        assert_eq!(ConfigKey::from("a/b.c/d").normalized(), "a.b.c.d");
    }

    #[test]
    fn test_segments() {
        assert_eq!(
            ConfigKey::from("a/b.c").segments().unwrap(),
            vec!["a", "b", "c"]
        );
        assert_eq!(ConfigKey::from("single").segments().unwrap(), vec!["single"]);
    }

    #[test]
    fn test_segments_rejects_empty_segments() {
        for path in ["", "a..b", ".a", "a.", "a//b"] {
            let err = ConfigKey::from(path).segments().unwrap_err();
            assert!(err.is_unknown_option(), "path {:?}", path);
        }
    }
}
