// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value tree with path addressing and type-safe conversions.
//!
//! `ConfigValue` is the single representation used for raw user input and for
//! validated output. Mappings are addressed by path segments; the tree supports
//! lookup, creation of intermediate nodes on write, and deep merging.

use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A mapping from segment name to value.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A node of a configuration tree.
///
/// # Examples
///
/// ```
/// use schemacfg::domain::config_value::ConfigValue;
///
/// let value = ConfigValue::mapping([("port", ConfigValue::from(5432))]);
/// assert_eq!(value.get_path(&["port"]), Some(&ConfigValue::Integer(5432)));
/// assert_eq!(value.get_path(&["port"]).unwrap().as_i64("db.port").unwrap(), 5432);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// An explicit null.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    Sequence(Vec<ConfigValue>),
    /// A mapping of named values.
    Mapping(ConfigMap),
}

/// Reason a write into a tree was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathConflict {
    /// Number of leading segments that address the value that cannot be
    /// written into.
    pub depth: usize,
}

impl ConfigValue {
    /// Builds a mapping from `(key, value)` pairs.
    pub fn mapping<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ConfigValue)>,
    {
        ConfigValue::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the name of the value's kind, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Null => "null",
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Integer(_) => "int",
            ConfigValue::Float(_) => "float",
            ConfigValue::String(_) => "string",
            ConfigValue::Sequence(_) => "list",
            ConfigValue::Mapping(_) => "array",
        }
    }

    /// Returns `true` if the value is a mapping or a sequence.
    pub fn is_container(&self) -> bool {
        matches!(self, ConfigValue::Mapping(_) | ConfigValue::Sequence(_))
    }

    /// Returns `true` if the value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }

    /// Infers a scalar from its textual form.
    ///
    /// `true`/`false` become booleans, integral numbers become integers, other
    /// numbers become floats and everything else stays a string.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemacfg::domain::config_value::ConfigValue;
    ///
    /// assert_eq!(ConfigValue::infer("8080"), ConfigValue::Integer(8080));
    /// assert_eq!(ConfigValue::infer("TRUE"), ConfigValue::Bool(true));
    /// assert_eq!(ConfigValue::infer("localhost"), ConfigValue::from("localhost"));
    /// ```
    pub fn infer(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "true" => return ConfigValue::Bool(true),
            "false" => return ConfigValue::Bool(false),
            _ => {}
        }
        if let Ok(n) = raw.parse::<i64>() {
            return ConfigValue::Integer(n);
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => ConfigValue::Float(f),
            _ => ConfigValue::String(raw.to_string()),
        }
    }

    /// Looks up the value at `segments`.
    ///
    /// Sequences are indexed by decimal position. An empty path returns the
    /// value itself.
    pub fn get_path<S: AsRef<str>>(&self, segments: &[S]) -> Option<&ConfigValue> {
        segments
            .iter()
            .try_fold(self, |node, segment| match node {
                ConfigValue::Mapping(map) => map.get(segment.as_ref()),
                ConfigValue::Sequence(seq) => segment
                    .as_ref()
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| seq.get(index)),
                _ => None,
            })
    }

    /// Writes `value` at `segments`, creating intermediate mappings as needed.
    ///
    /// A `Null` value on the way is replaced by a mapping. Sequences are
    /// entered by decimal position, which must already exist. Any other
    /// value on the way is a conflict and leaves the tree untouched.
    pub fn set_path<S: AsRef<str>>(
        &mut self,
        segments: &[S],
        value: ConfigValue,
    ) -> std::result::Result<(), PathConflict> {
        if let Some(depth) = self.first_conflict(segments) {
            return Err(PathConflict { depth });
        }

        let mut node = self;
        for (depth, segment) in segments.iter().enumerate() {
            node = node
                .slot_mut(segment.as_ref())
                .ok_or(PathConflict { depth })?;
        }
        *node = value;
        Ok(())
    }

    /// Returns the child slot named `segment`, creating it in mappings.
    fn slot_mut(&mut self, segment: &str) -> Option<&mut ConfigValue> {
        if self.is_null() {
            *self = ConfigValue::Mapping(ConfigMap::new());
        }
        match self {
            ConfigValue::Mapping(map) => {
                Some(map.entry(segment.to_string()).or_insert(ConfigValue::Null))
            }
            ConfigValue::Sequence(seq) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| seq.get_mut(index)),
            _ => None,
        }
    }

    fn first_conflict<S: AsRef<str>>(&self, segments: &[S]) -> Option<usize> {
        let mut node = self;
        for (depth, segment) in segments.iter().enumerate() {
            let child = match node {
                ConfigValue::Null => return None,
                ConfigValue::Mapping(map) => map.get(segment.as_ref()),
                ConfigValue::Sequence(seq) => match segment.as_ref().parse::<usize>() {
                    Ok(index) if index < seq.len() => seq.get(index),
                    _ => return Some(depth),
                },
                _ => return Some(depth),
            };
            match child {
                Some(child) => node = child,
                None => return None,
            }
        }
        None
    }

    /// Deep-merges `other` into this value.
    ///
    /// Mappings are merged key by key; any other combination is replaced by
    /// the incoming value.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemacfg::domain::config_value::ConfigValue;
    ///
    /// let mut base = ConfigValue::mapping([
    ///     ("db", ConfigValue::mapping([("host", "a".into()), ("port", 1.into())])),
    /// ]);
    /// base.merge(ConfigValue::mapping([
    ///     ("db", ConfigValue::mapping([("host", "b".into())])),
    /// ]));
    /// assert_eq!(base.get_path(&["db", "host"]), Some(&ConfigValue::from("b")));
    /// assert_eq!(base.get_path(&["db", "port"]), Some(&ConfigValue::from(1)));
    /// ```
    pub fn merge(&mut self, other: ConfigValue) {
        match (self, other) {
            (ConfigValue::Mapping(base), ConfigValue::Mapping(incoming)) => {
                merge_maps(base, incoming);
            }
            (slot, incoming) => *slot = incoming,
        }
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self, key: &str) -> Result<&str> {
        match self {
            ConfigValue::String(s) => Ok(s),
            other => Err(ConfigError::type_mismatch(key, "string", other.type_name())),
        }
    }

    /// Converts the value to a boolean.
    ///
    /// Strings are accepted using the following (case-insensitive) values:
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self {
            ConfigValue::Bool(b) => Ok(*b),
            ConfigValue::String(s) => match s.to_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Ok(true),
                "false" | "no" | "0" | "off" => Ok(false),
                _ => s
                    .parse::<bool>()
                    .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
            },
            other => Err(ConfigError::type_mismatch(key, "boolean", other.type_name())),
        }
    }

    /// Converts the value to an `i64`.
    pub fn as_i64(&self, key: &str) -> Result<i64> {
        match self {
            ConfigValue::Integer(n) => Ok(*n),
            ConfigValue::String(s) => s
                .parse::<i64>()
                .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e)),
            other => Err(ConfigError::type_mismatch(key, "integer", other.type_name())),
        }
    }

    /// Converts the value to a `u64`.
    pub fn as_u64(&self, key: &str) -> Result<u64> {
        match self {
            ConfigValue::Integer(n) => u64::try_from(*n).map_err(|e| {
                ConfigError::TypeConversionError {
                    key: key.to_string(),
                    target_type: "unsigned integer".to_string(),
                    source: Box::new(e),
                }
            }),
            ConfigValue::String(s) => s
                .parse::<u64>()
                .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e)),
            other => Err(ConfigError::type_mismatch(
                key,
                "unsigned integer",
                other.type_name(),
            )),
        }
    }

    /// Converts the value to an `f64`. Integers are widened.
    pub fn as_f64(&self, key: &str) -> Result<f64> {
        match self {
            ConfigValue::Float(f) => Ok(*f),
            ConfigValue::Integer(n) => Ok(*n as f64),
            ConfigValue::String(s) => s
                .parse::<f64>()
                .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e)),
            other => Err(ConfigError::type_mismatch(key, "float", other.type_name())),
        }
    }

    /// Returns the value as a sequence.
    pub fn as_sequence(&self, key: &str) -> Result<&[ConfigValue]> {
        match self {
            ConfigValue::Sequence(seq) => Ok(seq),
            other => Err(ConfigError::type_mismatch(key, "list", other.type_name())),
        }
    }

    /// Returns the value as a mapping.
    pub fn as_mapping(&self, key: &str) -> Result<&ConfigMap> {
        match self {
            ConfigValue::Mapping(map) => Ok(map),
            other => Err(ConfigError::type_mismatch(key, "array", other.type_name())),
        }
    }
}

/// Deep-merges `incoming` into `base`, last write wins for non-mappings.
pub fn merge_maps(base: &mut ConfigMap, incoming: ConfigMap) {
    for (key, value) in incoming {
        match base.get_mut(&key) {
            Some(existing) => existing.merge(value),
            None => {
                base.insert(key, value);
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Integer(n)
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Integer(i64::from(n))
    }
}

impl From<u32> for ConfigValue {
    fn from(n: u32) -> Self {
        ConfigValue::Integer(i64::from(n))
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Mapping(map)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Null => f.write_str("null"),
            ConfigValue::Bool(b) => write!(f, "{}", b),
            ConfigValue::Integer(n) => write!(f, "{}", n),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::String(s) => write!(f, "'{}'", s),
            ConfigValue::Sequence(seq) => {
                f.write_str("[")?;
                for (i, item) in seq.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            ConfigValue::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, item)?;
                }
                f.write_str("}")
            }
        }
    }
}
