// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file configuration source adapter.
//!
//! This module provides an adapter that reads raw configuration values from
//! YAML files, keeping the document's nesting intact.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::{ConfigParser, ConfigSource};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum allowed file size for YAML configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_YAML_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// YAML parser implementation.
///
/// Mapping keys that are not strings (numbers, booleans) are converted to
/// their textual form. Tagged values are unwrapped.
///
/// # Examples
///
/// ```rust
/// use schemacfg::adapters::YamlParser;
/// use schemacfg::domain::ConfigValue;
/// use schemacfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: localhost\n  port: 5432";
/// let result = parser.parse(yaml_content).unwrap();
/// let database = result.get("database").unwrap();
/// assert_eq!(database.get_path(&["port"]), Some(&ConfigValue::Integer(5432)));
/// ```
#[derive(Debug, Clone)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Converts a YAML value into a configuration value.
    fn convert(value: serde_yaml::Value) -> ConfigValue {
        match value {
            serde_yaml::Value::Null => ConfigValue::Null,
            serde_yaml::Value::Bool(b) => ConfigValue::Bool(b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Integer(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => ConfigValue::String(s),
            serde_yaml::Value::Sequence(seq) => {
                ConfigValue::Sequence(seq.into_iter().map(Self::convert).collect())
            }
            serde_yaml::Value::Mapping(map) => ConfigValue::Mapping(
                map.into_iter()
                    .filter_map(|(key, val)| {
                        Self::key_to_string(key).map(|k| (k, Self::convert(val)))
                    })
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value),
        }
    }

    fn key_to_string(key: serde_yaml::Value) -> Option<String> {
        match key {
            serde_yaml::Value::String(s) => Some(s),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            other => {
                tracing::debug!("Skipping YAML mapping entry with non-scalar key: {:?}", other);
                None
            }
        }
    }
}

impl Default for YamlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<ConfigMap> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        match Self::convert(value) {
            ConfigValue::Mapping(map) => Ok(map),
            ConfigValue::Null => Ok(ConfigMap::new()),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "Expected a mapping at the top of the YAML document, found {}",
                    other.type_name()
                ),
                source: None,
            }),
        }
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Configuration source adapter for YAML files.
///
/// The file is read once, when the adapter is created.
///
/// # Priority
///
/// YAML files have a priority of 1, which means they are overridden by both
/// environment variables (priority 2) and command-line arguments (priority 3).
///
/// # Examples
///
/// ```rust,no_run
/// use schemacfg::adapters::YamlFileAdapter;
///
/// // Load from a specific file
/// let adapter = YamlFileAdapter::from_file("/path/to/config.yaml").unwrap();
///
/// // Load from default OS location
/// let adapter = YamlFileAdapter::from_default_location("myapp", "com.example").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct YamlFileAdapter {
    /// Path to the YAML file
    file_path: PathBuf,
    /// Parsed configuration values
    values: ConfigMap,
}

impl YamlFileAdapter {
    /// Creates a new YAML file adapter from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SourceError` if the file cannot be read or is too
    /// large, and `ConfigError::ParseError` if it is not valid YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let parser = YamlParser::new();

        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = file_path
            .canonicalize()
            .map_err(|e| ConfigError::SourceError {
                source_name: "yaml-file".to_string(),
                message: format!("Invalid or inaccessible path: {}", display_name(&file_path)),
                source: Some(Box::new(e)),
            })?;

        // Check file size before reading to prevent DoS via large files
        let metadata = fs::metadata(&canonical_path).map_err(|e| ConfigError::SourceError {
            source_name: "yaml-file".to_string(),
            message: format!(
                "Failed to read file metadata: {}",
                display_name(&canonical_path)
            ),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_YAML_FILE_SIZE {
            return Err(ConfigError::SourceError {
                source_name: "yaml-file".to_string(),
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_YAML_FILE_SIZE
                ),
                source: None,
            });
        }

        let content = fs::read_to_string(&canonical_path).map_err(|e| ConfigError::SourceError {
            source_name: "yaml-file".to_string(),
            message: format!(
                "Failed to read configuration file: {}",
                display_name(&canonical_path)
            ),
            source: Some(Box::new(e)),
        })?;

        let values = parser.parse(&content)?;
        tracing::debug!(
            "Loaded {} top-level entries from {}",
            values.len(),
            canonical_path.display()
        );

        Ok(Self {
            file_path: canonical_path,
            values,
        })
    }

    /// Creates a new YAML file adapter from the default OS-appropriate location.
    ///
    /// This looks for `config.yaml` in the configuration directory that the
    /// `directories` crate reports for the application.
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, "config.yaml")
    }

    /// Creates a new YAML file adapter with a custom file name in the default location.
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: "yaml-file".to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Self::from_file(proj_dirs.config_dir().join(filename))
    }

    /// Returns the path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

impl ConfigSource for YamlFileAdapter {
    fn name(&self) -> &str {
        "yaml-file"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn load(&self) -> Result<ConfigMap> {
        Ok(self.values.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_yaml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_nested() {
        let parsed = YamlParser::new()
            .parse("app:\n  name: svc\n  hosts:\n    - a\n    - b\n  ratio: 0.5\n")
            .unwrap();
        let app = parsed.get("app").unwrap();
        assert_eq!(app.get_path(&["name"]), Some(&ConfigValue::from("svc")));
        assert_eq!(app.get_path(&["hosts", "1"]), Some(&ConfigValue::from("b")));
        assert_eq!(app.get_path(&["ratio"]), Some(&ConfigValue::Float(0.5)));
    }

    #[test]
    fn test_parse_non_string_keys() {
        let parsed = YamlParser::new().parse("codes:\n  404: missing\n").unwrap();
        assert_eq!(
            parsed.get("codes").unwrap().get_path(&["404"]),
            Some(&ConfigValue::from("missing"))
        );
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(YamlParser::new().parse("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_top_level_scalar() {
        let result = YamlParser::new().parse("just a string");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = YamlParser::new().parse("a: [unclosed");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_supported_extensions() {
        assert_eq!(YamlParser::new().supported_extensions(), &["yaml", "yml"]);
    }

    #[test]
    fn test_adapter_from_file() {
        let file = write_yaml("db:\n  host: localhost\n");
        let adapter = YamlFileAdapter::from_file(file.path()).unwrap();

        assert_eq!(adapter.name(), "yaml-file");
        assert_eq!(adapter.priority(), 1);
        let values = adapter.load().unwrap();
        assert_eq!(
            values.get("db").unwrap().get_path(&["host"]),
            Some(&ConfigValue::from("localhost"))
        );
    }

    #[test]
    fn test_adapter_missing_file() {
        let result = YamlFileAdapter::from_file("/definitely/not/here.yaml");
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    }
}
