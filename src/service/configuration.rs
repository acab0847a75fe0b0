// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration store.
//!
//! [`Configuration`] owns the raw user values and the registered schemas, and
//! lazily derives validated values from them one namespace at a time. Built
//! namespaces and resolved paths are memoized until the next mutation.

use crate::domain::{
    ConfigError, ConfigKey, ConfigMap, ConfigValue, ConfigurationReader, MutableConfiguration,
    Result, SchemaBuilder,
};
use crate::ports::{ConfigSource, Processor, Schema};
use crate::service::builder::ConfigurationBuilder;
use crate::service::read_only::ReadOnlyConfiguration;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Target used for validator warnings.
const DEPRECATION_TARGET: &str = "schemacfg::deprecation";

/// Derived state, discarded as a whole on every mutation.
#[derive(Debug, Default)]
struct BuildState {
    /// Validated subtree per built namespace
    namespaces: HashMap<String, ConfigValue>,
    /// Resolved values keyed by the exact requested path
    cache: HashMap<String, ConfigValue>,
}

/// Outcome of resolving a path against the built configuration.
enum Resolution {
    Found(ConfigValue),
    Unknown(ConfigError),
}

/// A hierarchical configuration store with per-namespace schemas.
///
/// Raw values are supplied with [`MutableConfiguration::set`] and
/// [`MutableConfiguration::merge`]; schemas are registered per top-level
/// namespace with [`SchemaBuilder::add_schema`]. Reads go through
/// [`ConfigurationReader`], which validates the requested namespace on first
/// access and caches the result until the next mutation.
///
/// Mutations take `&mut self`, so a store shared between threads needs
/// external synchronization for writes.
///
/// # Examples
///
/// ```rust
/// use schemacfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let mut config = Configuration::new();
/// config.add_schema(
///     "db",
///     Expect::structure([
///         ("host", Expect::string().required()),
///         ("port", Expect::int().default(5432)),
///     ]),
/// );
/// config.set("db.host", "x")?;
///
/// assert_eq!(config.get("db.port")?, ConfigValue::Integer(5432));
/// assert!(config.exists("db/host")?);
/// assert!(!config.exists("db.user")?);
/// # Ok(())
/// # }
/// ```
pub struct Configuration {
    /// Raw values exactly as supplied
    user_config: ConfigValue,
    /// Schema per namespace
    schemas: HashMap<String, Arc<dyn Schema>>,
    state: RwLock<BuildState>,
}

impl Configuration {
    /// Creates an empty configuration with no schemas.
    pub fn new() -> Self {
        Self {
            user_config: ConfigValue::Mapping(ConfigMap::new()),
            schemas: HashMap::new(),
            state: RwLock::new(BuildState::default()),
        }
    }

    /// Creates a configuration seeded with a set of schemas.
    pub fn with_schemas<I, K>(schemas: I) -> Self
    where
        I: IntoIterator<Item = (K, Arc<dyn Schema>)>,
        K: Into<String>,
    {
        let mut config = Self::new();
        config.schemas = schemas.into_iter().map(|(k, s)| (k.into(), s)).collect();
        config
    }

    /// Creates a new configuration builder.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Returns a read-only view of this configuration.
    ///
    /// The view shares this store's state and caches; it exposes only
    /// [`ConfigurationReader`].
    pub fn reader(&self) -> ReadOnlyConfiguration<'_> {
        ReadOnlyConfiguration::new(self)
    }

    /// Registers an already shared schema for `namespace`.
    pub fn add_shared_schema(&mut self, namespace: &str, schema: Arc<dyn Schema>) {
        self.invalidate();
        self.schemas.insert(namespace.to_string(), schema);
    }

    /// Returns `true` if a schema is registered for `namespace`.
    pub fn has_schema(&self, namespace: &str) -> bool {
        self.schemas.contains_key(namespace)
    }

    /// Deep-merges the values provided by `source`.
    ///
    /// # Errors
    ///
    /// Returns the source's error if it fails to load; the store is left
    /// unchanged in that case.
    pub fn merge_source(&mut self, source: &dyn ConfigSource) -> Result<()> {
        let values = source.load()?;
        tracing::debug!(
            "Merging {} top-level entries from source '{}'",
            values.len(),
            source.name()
        );
        self.merge(values);
        Ok(())
    }

    /// Returns the raw, unvalidated values.
    pub fn raw(&self) -> &ConfigValue {
        &self.user_config
    }

    fn read_state(&self) -> RwLockReadGuard<'_, BuildState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, BuildState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drops every built namespace and cached value in one step.
    fn invalidate(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if !state.namespaces.is_empty() || !state.cache.is_empty() {
            tracing::debug!(
                "Invalidating {} built namespace(s) and {} cached value(s)",
                state.namespaces.len(),
                state.cache.len()
            );
        }
        *state = BuildState::default();
    }

    /// Validates `namespace` unless it has been built since the last mutation.
    fn build(&self, namespace: &str) -> Result<()> {
        if self.read_state().namespaces.contains_key(namespace) {
            return Ok(());
        }

        let schema = self.schemas.get(namespace).ok_or_else(|| {
            ConfigError::unknown_option(
                namespace,
                format!("Missing config schema for \"{}\"", namespace),
            )
        })?;

        let input = self.user_config.get_path(&[namespace]);
        let processed = Processor::process(schema.as_ref(), namespace, input)
            .map_err(|messages| ConfigError::ValidationFailed { messages })?;

        for warning in &processed.warnings {
            tracing::warn!(target: DEPRECATION_TARGET, namespace, "{}", warning);
        }

        tracing::debug!(namespace, "Built configuration namespace");
        self.write_state()
            .namespaces
            .insert(namespace.to_string(), processed.output.into_value());
        Ok(())
    }

    /// Resolves `key`, reporting path problems as [`Resolution::Unknown`].
    ///
    /// Only errors that must reach the caller regardless of the operation,
    /// such as validation failures, are returned as `Err`.
    fn resolve(&self, key: &ConfigKey) -> Result<Resolution> {
        let segments = match key.segments() {
            Ok(segments) => segments,
            Err(e) => return Ok(Resolution::Unknown(e)),
        };
        let namespace = segments[0];

        match self.build(namespace) {
            Ok(()) => {}
            Err(e) if e.is_unknown_option() => return Ok(Resolution::Unknown(e)),
            Err(e) => return Err(e),
        }

        let state = self.read_state();
        let found = state
            .namespaces
            .get(namespace)
            .and_then(|subtree| subtree.get_path(&segments[1..]));

        Ok(match found {
            Some(value) => Resolution::Found(value.clone()),
            None => Resolution::Unknown(ConfigError::unknown_option(
                key.as_str(),
                format!("No configuration option exists at path \"{}\"", key),
            )),
        })
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut namespaces: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        namespaces.sort_unstable();
        f.debug_struct("Configuration")
            .field("user_config", &self.user_config)
            .field("schemas", &namespaces)
            .field("state", &*self.read_state())
            .finish()
    }
}

impl ConfigurationReader for Configuration {
    fn get(&self, key: &str) -> Result<ConfigValue> {
        if let Some(value) = self.read_state().cache.get(key) {
            tracing::trace!("Cache hit for '{}'", key);
            return Ok(value.clone());
        }

        match self.resolve(&ConfigKey::from(key))? {
            Resolution::Found(value) => {
                self.write_state()
                    .cache
                    .insert(key.to_string(), value.clone());
                Ok(value)
            }
            Resolution::Unknown(e) => Err(e),
        }
    }

    fn exists(&self, key: &str) -> Result<bool> {
        if self.read_state().cache.contains_key(key) {
            return Ok(true);
        }

        match self.resolve(&ConfigKey::from(key))? {
            Resolution::Found(_) => Ok(true),
            Resolution::Unknown(_) => Ok(false),
        }
    }
}

impl MutableConfiguration for Configuration {
    fn set<V: Into<ConfigValue>>(&mut self, key: &str, value: V) -> Result<()> {
        self.invalidate();

        let key = ConfigKey::from(key);
        let segments = key.segments()?;
        let Err(conflict) = self.user_config.set_path(&segments, value.into()) else {
            return Ok(());
        };

        let ancestor = &segments[..conflict.depth];
        let found = self
            .user_config
            .get_path(ancestor)
            .map_or("null", ConfigValue::type_name);
        Err(ConfigError::unknown_option(
            key.as_str(),
            format!(
                "Key path \"{}\" cannot be written: \"{}\" holds {} and has no item \"{}\"",
                key,
                ancestor.join("."),
                found,
                segments[conflict.depth]
            ),
        ))
    }

    fn merge(&mut self, config: ConfigMap) {
        self.invalidate();
        self.user_config.merge(ConfigValue::Mapping(config));
    }
}

impl SchemaBuilder for Configuration {
    fn add_schema<S: Schema + 'static>(&mut self, namespace: &str, schema: S) {
        self.add_shared_schema(namespace, Arc::new(schema));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Expect;
    use crate::ports::{ProcessContext, SchemaOutput};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        inner: Expect,
        calls: Arc<AtomicUsize>,
    }

    impl Schema for Counting {
        fn process(
            &self,
            value: Option<&ConfigValue>,
            context: &mut ProcessContext,
        ) -> SchemaOutput {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.process(value, context)
        }
    }

    fn counting(inner: Expect) -> (Counting, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Counting {
                inner,
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }

    fn app_schema() -> Expect {
        Expect::structure([
            ("name", Expect::string().required()),
            ("debug", Expect::bool().default(false)),
        ])
    }

    #[test]
    fn test_build_is_memoized_per_namespace() {
        let (schema, calls) = counting(app_schema());
        let mut config = Configuration::new();
        config.add_schema("app", schema);
        config.set("app.name", "svc").unwrap();

        assert_eq!(config.get("app.name").unwrap(), ConfigValue::from("svc"));
        assert_eq!(config.get("app.debug").unwrap(), ConfigValue::Bool(false));
        assert_eq!(config.get("app.name").unwrap(), ConfigValue::from("svc"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cache_is_keyed_by_exact_path() {
        let mut config = Configuration::new();
        config.add_schema("app", app_schema());
        config.set("app.name", "svc").unwrap();

        config.get("app.name").unwrap();
        config.get("app/name").unwrap();

        let state = config.read_state();
        assert!(state.cache.contains_key("app.name"));
        assert!(state.cache.contains_key("app/name"));
        assert_eq!(state.namespaces.len(), 1);
    }

    #[test]
    fn test_mutations_clear_derived_state() {
        let mut config = Configuration::new();
        config.add_schema("app", app_schema());
        config.set("app.name", "svc").unwrap();
        config.get("app.name").unwrap();

        config.merge(ConfigMap::new());
        {
            let state = config.read_state();
            assert!(state.namespaces.is_empty());
            assert!(state.cache.is_empty());
        }

        config.get("app.name").unwrap();
        config.add_schema("other", Expect::any());
        assert!(config.read_state().cache.is_empty());
    }

    #[test]
    fn test_failed_build_does_not_populate_state() {
        let mut config = Configuration::new();
        config.add_schema("app", app_schema());

        let err = config.get("app.name").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationFailed { .. }));
        let state = config.read_state();
        assert!(state.namespaces.is_empty());
        assert!(state.cache.is_empty());
    }

    #[test]
    fn test_exists_does_not_cache() {
        let mut config = Configuration::new();
        config.add_schema("app", app_schema());
        config.set("app.name", "svc").unwrap();

        assert!(config.exists("app.name").unwrap());
        assert!(config.read_state().cache.is_empty());
        assert_eq!(config.read_state().namespaces.len(), 1);
    }

    #[test]
    fn test_exists_after_get_uses_cache() {
        let (schema, calls) = counting(app_schema());
        let mut config = Configuration::new();
        config.add_schema("app", schema);
        config.set("app.name", "svc").unwrap();

        config.get("app.name").unwrap();
        assert!(config.exists("app.name").unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_namespace_without_raw_values_is_defaulted() {
        let mut config = Configuration::new();
        config.add_schema(
            "log",
            Expect::structure([("level", Expect::string().default("info"))]),
        );
        assert_eq!(config.get("log.level").unwrap(), ConfigValue::from("info"));
        assert_eq!(
            config.get("log").unwrap(),
            ConfigValue::mapping([("level", "info".into())])
        );
    }

    #[test]
    fn test_set_conflict_message_names_ancestor() {
        let mut config = Configuration::new();
        config.set("app.name", "svc").unwrap();
        let err = config.set("app.name.sub", 1).unwrap_err();
        assert_eq!(err.path(), Some("app.name.sub"));
        assert!(err.to_string().contains("\"app.name\" holds string"));
        assert_eq!(
            config.raw().get_path(&["app", "name"]),
            Some(&ConfigValue::from("svc"))
        );
    }

    #[test]
    fn test_set_writes_into_sequence_items() {
        let mut config = Configuration::new();
        config.add_schema(
            "app",
            Expect::structure([("hosts", Expect::list_of(Expect::string()))]),
        );
        config.set("app.hosts", vec!["a", "b"]).unwrap();
        assert_eq!(config.get("app.hosts.1").unwrap(), ConfigValue::from("b"));

        config.set("app.hosts.1", "z").unwrap();
        assert_eq!(config.get("app.hosts.1").unwrap(), ConfigValue::from("z"));
        assert_eq!(config.get("app/hosts/0").unwrap(), ConfigValue::from("a"));
    }

    #[test]
    fn test_set_out_of_range_sequence_item() {
        let mut config = Configuration::new();
        config.set("app.hosts", vec!["a", "b"]).unwrap();

        let err = config.set("app.hosts.5", "z").unwrap_err();
        assert!(err.is_unknown_option());
        let message = err.to_string();
        assert!(message.contains("\"app.hosts\" holds list"));
        assert!(message.contains("\"5\""));
        assert_eq!(
            config.raw().get_path(&["app", "hosts"]),
            Some(&ConfigValue::from(vec!["a", "b"]))
        );
    }

    #[test]
    fn test_set_rejects_malformed_path() {
        let mut config = Configuration::new();
        assert!(config.set("", 1).unwrap_err().is_unknown_option());
        assert!(config.set("a..b", 1).unwrap_err().is_unknown_option());
    }

    #[test]
    fn test_with_schemas() {
        let schema: Arc<dyn Schema> = Arc::new(Expect::int().default(1));
        let config = Configuration::with_schemas([("retries", schema)]);
        assert!(config.has_schema("retries"));
        assert_eq!(config.get("retries").unwrap(), ConfigValue::Integer(1));
    }

    #[test]
    fn test_debug_lists_schemas() {
        let mut config = Configuration::new();
        config.add_schema("b", Expect::any());
        config.add_schema("a", Expect::any());
        let debug = format!("{:?}", config);
        assert!(debug.contains("[\"a\", \"b\"]"));
    }
}
