// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! This module provides an adapter that reads raw configuration values from
//! environment variables. Nesting is expressed with a separator (`__` by
//! default), so `APP_DB__PORT=5432` with prefix `APP_` becomes `db.port`.

use crate::domain::{ConfigMap, ConfigValue, Result};
use crate::ports::ConfigSource;
use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Configuration source adapter for environment variables.
///
/// # Priority
///
/// Environment variables have a priority of 2, which means they override configuration
/// files (priority 1) but are overridden by command-line arguments (priority 3).
///
/// # Examples
///
/// ```rust
/// use schemacfg::adapters::EnvVarAdapter;
/// use schemacfg::domain::ConfigValue;
/// use schemacfg::ports::ConfigSource;
/// use std::collections::HashMap;
///
/// let mut vars = HashMap::new();
/// vars.insert("MYAPP_DB__PORT".to_string(), "5432".to_string());
/// vars.insert("OTHER".to_string(), "ignored".to_string());
///
/// let adapter = EnvVarAdapter::with_prefix("MYAPP_").with_vars(vars);
/// let values = adapter.load().unwrap();
/// assert_eq!(values["db"].get_path(&["port"]), Some(&ConfigValue::Integer(5432)));
/// assert_eq!(values.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EnvVarAdapter {
    /// Optional prefix to filter environment variables
    prefix: Option<String>,
    /// Separator between nesting levels
    separator: String,
    /// Whether to convert keys to lowercase
    lowercase_keys: bool,
    /// Whether to infer booleans and numbers from the text
    infer_types: bool,
    /// Fixed variables used instead of the process environment
    vars: Option<BTreeMap<String, String>>,
}

impl EnvVarAdapter {
    /// Creates a new environment variable adapter without prefix filtering.
    pub fn new() -> Self {
        Self {
            prefix: None,
            separator: "__".to_string(),
            lowercase_keys: true,
            infer_types: true,
            vars: None,
        }
    }

    /// Creates a new environment variable adapter with prefix filtering.
    ///
    /// Only environment variables starting with the given prefix will be read.
    /// The prefix is stripped from the key before it is split.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new()
        }
    }

    /// Sets the separator between nesting levels.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets whether to convert keys to lowercase (enabled by default).
    pub fn lowercase_keys(mut self, enabled: bool) -> Self {
        self.lowercase_keys = enabled;
        self
    }

    /// Sets whether `true`/`false` and numbers are converted from text
    /// (enabled by default).
    pub fn infer_types(mut self, enabled: bool) -> Self {
        self.infer_types = enabled;
        self
    }

    /// Reads from the given variables instead of the process environment.
    ///
    /// **Note**: This method is primarily intended for testing.
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    fn snapshot(&self) -> BTreeMap<String, String> {
        match &self.vars {
            Some(vars) => vars.clone(),
            None => unicode_vars(env::vars_os()),
        }
    }

    /// Turns a variable name into path segments, or `None` if it is filtered out.
    fn segments(&self, key: &str) -> Option<Vec<String>> {
        let key = match &self.prefix {
            Some(prefix) => key.strip_prefix(prefix.as_str())?,
            None => key,
        };
        let key = if self.lowercase_keys {
            key.to_lowercase()
        } else {
            key.to_string()
        };

        let segments: Vec<String> = key
            .split(self.separator.as_str())
            .map(String::from)
            .collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(segments)
    }
}

/// Keeps the variables whose name and value are both valid UTF-8.
fn unicode_vars<I>(vars: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::debug!(
                    "Skipping environment variable with non-UTF-8 content: {:?}",
                    key.unwrap_or_else(|raw| raw.to_string_lossy().into_owned())
                );
                None
            }
        })
        .collect()
}

impl Default for EnvVarAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn load(&self) -> Result<ConfigMap> {
        let mut root = ConfigValue::Mapping(ConfigMap::new());

        for (key, value) in self.snapshot() {
            // Validate input sizes to prevent DoS
            if key.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    key.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }

            let Some(segments) = self.segments(&key) else {
                continue;
            };

            let value = if self.infer_types {
                ConfigValue::infer(&value)
            } else {
                ConfigValue::String(value)
            };

            if root.set_path(&segments, value).is_err() {
                tracing::debug!(
                    "Skipping environment variable '{}': it conflicts with a scalar set by another variable",
                    key
                );
            }
        }

        match root {
            ConfigValue::Mapping(map) => Ok(map),
            _ => Ok(ConfigMap::new()),
        }
    }
}
