// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument configuration source adapter.
//!
//! This module provides an adapter that reads raw configuration values from
//! command-line arguments. Keys are configuration paths, so `--db.port=5432`
//! and `--db/port 5432` both set `db.port`.

use crate::domain::{ConfigKey, ConfigMap, ConfigValue, Result};
use crate::ports::ConfigSource;

/// Configuration source adapter for command-line arguments.
///
/// Supported argument formats:
/// - `--key=value`: Long form with equals sign
/// - `--key value`: Long form with space-separated value
///
/// Values are type-inferred: `true`/`false` become booleans and numbers become
/// integers or floats. Later occurrences of a key override earlier ones.
///
/// # Priority
///
/// Command-line arguments have the highest priority (3), which means they override
/// both environment variables (priority 2) and configuration files (priority 1).
///
/// # Examples
///
/// ```rust
/// use schemacfg::adapters::CommandLineAdapter;
/// use schemacfg::domain::ConfigValue;
/// use schemacfg::ports::ConfigSource;
///
/// let args = vec!["--database.host=localhost", "--database.port", "5432"];
/// let adapter = CommandLineAdapter::from_args(args);
/// let values = adapter.load().unwrap();
/// assert_eq!(values["database"].get_path(&["port"]), Some(&ConfigValue::Integer(5432)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineAdapter {
    /// Parsed arguments, in order
    values: Vec<(String, String)>,
}

impl CommandLineAdapter {
    /// Creates a new command-line adapter with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new command-line adapter from a vector of arguments.
    pub fn from_args<S: AsRef<str>>(args: Vec<S>) -> Self {
        let mut adapter = Self::new();
        adapter.parse_args(&args);
        adapter
    }

    /// Creates a new command-line adapter from the process's command-line arguments.
    ///
    /// This skips the first argument (the program name) and parses the rest.
    pub fn from_env_args() -> Self {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::from_args(args)
    }

    /// Parses command-line arguments and populates the values list.
    fn parse_args<S: AsRef<str>>(&mut self, args: &[S]) {
        let mut i = 0;
        while i < args.len() {
            let Some(flag) = args[i].as_ref().strip_prefix("--") else {
                i += 1;
                continue;
            };

            // Handle --key=value format
            if let Some((key, value)) = flag.split_once('=') {
                self.values.push((key.to_string(), value.to_string()));
                i += 1;
                continue;
            }

            // Handle --key value format
            match args.get(i + 1).map(|next| next.as_ref()) {
                Some(next) if !next.starts_with('-') || is_number(next) => {
                    self.values.push((flag.to_string(), next.to_string()));
                    i += 2;
                }
                _ => {
                    tracing::debug!("Ignoring command-line flag '--{}' without a value", flag);
                    i += 1;
                }
            }
        }
    }
}

/// Negative numbers are values, not flags.
fn is_number(arg: &str) -> bool {
    matches!(
        ConfigValue::infer(arg),
        ConfigValue::Integer(_) | ConfigValue::Float(_)
    )
}

impl ConfigSource for CommandLineAdapter {
    fn name(&self) -> &str {
        "cli"
    }

    fn priority(&self) -> u8 {
        3
    }

    fn load(&self) -> Result<ConfigMap> {
        let mut root = ConfigValue::Mapping(ConfigMap::new());

        for (key, value) in &self.values {
            let key = ConfigKey::from(key.as_str());
            let segments = match key.segments() {
                Ok(segments) => segments,
                Err(e) => {
                    tracing::debug!("Ignoring command-line argument '{}': {}", key, e);
                    continue;
                }
            };
            if root.set_path(&segments, ConfigValue::infer(value)).is_err() {
                tracing::debug!(
                    "Ignoring command-line argument '{}': an ancestor already holds a value",
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
