// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fluent construction of a [`Configuration`].

use crate::domain::{ConfigMap, MutableConfiguration, Result};
use crate::ports::{ConfigSource, Schema};
use crate::service::Configuration;
use std::sync::Arc;

/// Builder for constructing a [`Configuration`].
///
/// Sources are merged in ascending priority order, so values from a source
/// with a higher priority replace those from lower ones. Values given with
/// [`ConfigurationBuilder::with_values`] are merged last.
///
/// # Examples
///
/// ```rust
/// use schemacfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let config = Configuration::builder()
///     .with_schema("app", Expect::structure([("port", Expect::int().default(80))]))
///     .with_cli_args(vec!["--app.port=8080"])
///     .build()?;
///
/// assert_eq!(config.get("app.port")?, ConfigValue::Integer(8080));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConfigurationBuilder {
    schemas: Vec<(String, Arc<dyn Schema>)>,
    sources: Vec<Box<dyn ConfigSource>>,
    values: Vec<ConfigMap>,
}

impl ConfigurationBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `schema` for `namespace`.
    pub fn with_schema<S: Schema + 'static>(mut self, namespace: &str, schema: S) -> Self {
        let schema: Arc<dyn Schema> = Arc::new(schema);
        self.schemas.push((namespace.to_string(), schema));
        self
    }

    /// Adds a raw value source.
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Adds raw values that are merged after every source.
    pub fn with_values(mut self, values: ConfigMap) -> Self {
        self.values.push(values);
        self
    }

    /// Adds environment variables as a source.
    #[cfg(feature = "env")]
    pub fn with_env_vars(self) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(EnvVarAdapter::new()))
    }

    /// Adds environment variables with a prefix as a source.
    ///
    /// ```rust
    /// use schemacfg::service::ConfigurationBuilder;
    ///
    /// # fn main() -> schemacfg::domain::Result<()> {
    /// let config = ConfigurationBuilder::new()
    ///     .with_env_prefix("MYAPP_")
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[cfg(feature = "env")]
    pub fn with_env_prefix(self, prefix: impl Into<String>) -> Self {
        use crate::adapters::EnvVarAdapter;
        self.with_source(Box::new(EnvVarAdapter::with_prefix(prefix)))
    }

    /// Adds command-line arguments as a source.
    #[cfg(feature = "cli")]
    pub fn with_cli_args<S: AsRef<str>>(self, args: Vec<S>) -> Self {
        use crate::adapters::CommandLineAdapter;
        self.with_source(Box::new(CommandLineAdapter::from_args(args)))
    }

    /// Adds a YAML file as a source.
    ///
    /// ```rust,no_run
    /// use schemacfg::service::ConfigurationBuilder;
    ///
    /// # fn main() -> schemacfg::domain::Result<()> {
    /// let config = ConfigurationBuilder::new()
    ///     .with_yaml_file("/etc/myapp/config.yaml")?
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[cfg(feature = "yaml")]
    pub fn with_yaml_file(self, path: impl AsRef<std::path::Path>) -> Result<Self> {
        use crate::adapters::YamlFileAdapter;
        let adapter = YamlFileAdapter::from_file(path)?;
        Ok(self.with_source(Box::new(adapter)))
    }

    /// Builds the configuration.
    ///
    /// No schema runs here; namespaces are validated on first access.
    ///
    /// # Errors
    ///
    /// Returns the first error reported by a source's `load`.
    pub fn build(mut self) -> Result<Configuration> {
        let mut config = Configuration::new();

        // Stable, so sources with equal priority keep insertion order
        self.sources.sort_by_key(|source| source.priority());
        for source in &self.sources {
            config.merge_source(source.as_ref())?;
        }

        for values in self.values {
            config.merge(values);
        }

        for (namespace, schema) in self.schemas {
            config.add_shared_schema(&namespace, schema);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Expect;
    use crate::domain::{ConfigError, ConfigValue, ConfigurationReader};

    struct MockSource {
        name: String,
        priority: u8,
        values: ConfigMap,
    }

    impl MockSource {
        fn new(name: &str, priority: u8) -> Self {
            Self {
                name: name.to_string(),
                priority,
                values: ConfigMap::new(),
            }
        }

        fn with_value(mut self, key: &str, value: impl Into<ConfigValue>) -> Self {
            self.values.insert(key.to_string(), value.into());
            self
        }
    }

    impl ConfigSource for MockSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn load(&self) -> Result<ConfigMap> {
            Ok(self.values.clone())
        }
    }

    struct FailingSource;

    impl ConfigSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn priority(&self) -> u8 {
            0
        }

        fn load(&self) -> Result<ConfigMap> {
            Err(ConfigError::SourceError {
                source_name: "failing".to_string(),
                message: "unreachable backend".to_string(),
                source: None,
            })
        }
    }

    #[test]
    fn test_builder_empty() {
        let config = ConfigurationBuilder::new().build().unwrap();
        assert!(!config.exists("anything").unwrap());
    }

    #[test]
    fn test_builder_priority_order() {
        let config = ConfigurationBuilder::new()
            .with_schema("n", Expect::int())
            .with_source(Box::new(MockSource::new("high", 3).with_value("n", 3)))
            .with_source(Box::new(MockSource::new("low", 1).with_value("n", 1)))
            .with_source(Box::new(MockSource::new("mid", 2).with_value("n", 2)))
            .build()
            .unwrap();
        assert_eq!(config.get("n").unwrap(), ConfigValue::Integer(3));
    }

    #[test]
    fn test_builder_equal_priority_keeps_insertion_order() {
        let config = ConfigurationBuilder::new()
            .with_schema("n", Expect::int())
            .with_source(Box::new(MockSource::new("first", 1).with_value("n", 1)))
            .with_source(Box::new(MockSource::new("second", 1).with_value("n", 2)))
            .build()
            .unwrap();
        assert_eq!(config.get("n").unwrap(), ConfigValue::Integer(2));
    }

    #[test]
    fn test_builder_values_override_sources() {
        let mut values = ConfigMap::new();
        values.insert("n".to_string(), ConfigValue::Integer(9));
        let config = ConfigurationBuilder::new()
            .with_schema("n", Expect::int())
            .with_values(values)
            .with_source(Box::new(MockSource::new("cli", 3).with_value("n", 3)))
            .build()
            .unwrap();
        assert_eq!(config.get("n").unwrap(), ConfigValue::Integer(9));
    }

    #[test]
    fn test_builder_propagates_source_errors() {
        let result = ConfigurationBuilder::new()
            .with_source(Box::new(FailingSource))
            .build();
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    }

    #[test]
    fn test_builder_does_not_validate_eagerly() {
        let config = ConfigurationBuilder::new()
            .with_schema("app", Expect::structure([("name", Expect::string().required())]))
            .build()
            .unwrap();
        assert!(matches!(
            config.get("app.name"),
            Err(ConfigError::ValidationFailed { .. })
        ));
    }
}
