// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only view over a [`Configuration`].

use crate::domain::{ConfigValue, ConfigurationReader, Result};
use crate::service::Configuration;

/// A borrowed view that can only read validated values.
///
/// The view delegates to the underlying store, so it shares its built
/// namespaces and cache. It has no way to mutate raw values or register
/// schemas.
///
/// # Examples
///
/// ```rust
/// use schemacfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let mut config = Configuration::new();
/// config.add_schema("app", Expect::structure([("name", Expect::string().default("svc"))]));
///
/// let reader = config.reader();
/// assert_eq!(reader.get("app.name")?, ConfigValue::from("svc"));
/// # Ok(())
/// # }
/// ```
///
/// Mutation is not available through the view:
///
/// ```compile_fail
/// use schemacfg::prelude::*;
///
/// let config = Configuration::new();
/// let mut reader = config.reader();
/// reader.set("app.name", "svc");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReadOnlyConfiguration<'a> {
    config: &'a Configuration,
}

impl<'a> ReadOnlyConfiguration<'a> {
    /// Wraps `config`.
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }
}

impl ConfigurationReader for ReadOnlyConfiguration<'_> {
    fn get(&self, key: &str) -> Result<ConfigValue> {
        self.config.get(key)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.config.exists(key)
    }
}

impl<'a> From<&'a Configuration> for ReadOnlyConfiguration<'a> {
    fn from(config: &'a Configuration) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Expect;
    use crate::domain::{ConfigError, MutableConfiguration, SchemaBuilder};

    fn configured() -> Configuration {
        let mut config = Configuration::new();
        config.add_schema(
            "db",
            Expect::structure([
                ("host", Expect::string().required()),
                ("port", Expect::int().default(5432)),
            ]),
        );
        config.set("db.host", "x").unwrap();
        config
    }

    #[test]
    fn test_reader_matches_store() {
        let config = configured();
        let reader = config.reader();
        for key in ["db.host", "db/port", "db"] {
            assert_eq!(reader.get(key).unwrap(), config.get(key).unwrap());
            assert_eq!(reader.exists(key).unwrap(), config.exists(key).unwrap());
        }
        assert!(!reader.exists("db.user").unwrap());
        assert!(!reader.exists("").unwrap());
    }

    #[test]
    fn test_reader_reports_errors() {
        let config = configured();
        let reader = ReadOnlyConfiguration::from(&config);
        assert!(matches!(
            reader.get("cache.ttl"),
            Err(ConfigError::UnknownOption { .. })
        ));
    }

    #[test]
    fn test_reader_as_trait_object() {
        let config = configured();
        let reader = config.reader();
        let dynamic: &dyn ConfigurationReader = &reader;
        assert_eq!(dynamic.get("db.port").unwrap(), ConfigValue::Integer(5432));
    }
}
