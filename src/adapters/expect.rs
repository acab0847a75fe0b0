// SPDX-License-Identifier: MIT OR Apache-2.0

//! Declarative schema adapter.
//!
//! This module provides [`Expect`], a composable implementation of the
//! [`Schema`] port covering the common needs of configuration validation:
//! typed scalars, nested structures, lists and maps, defaults, required
//! items, ranges, custom assertions and deprecation notices.

use crate::domain::{ConfigMap, ConfigValue};
use crate::ports::{ProcessContext, Schema, SchemaOutput};
use std::fmt;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&ConfigValue) -> bool + Send + Sync>;

#[derive(Clone)]
struct Assertion {
    predicate: Predicate,
    description: String,
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
enum Kind {
    Any,
    String,
    Int,
    Float,
    Bool,
    Structure {
        fields: Vec<(String, Expect)>,
        other_items: Option<Box<Expect>>,
    },
    ListOf(Box<Expect>),
    MapOf(Box<Expect>),
    AnyOf(Vec<ConfigValue>),
}

/// A declarative schema for one configuration item.
///
/// # Examples
///
/// ```rust
/// use schemacfg::adapters::Expect;
/// use schemacfg::domain::ConfigValue;
/// use schemacfg::ports::Processor;
///
/// let schema = Expect::structure([
///     ("host", Expect::string().required()),
///     ("port", Expect::int().default(5432).min(1.0).max(65535.0)),
/// ]);
///
/// let input = ConfigValue::mapping([("host", "db.internal".into())]);
/// let processed = Processor::process(&schema, "db", Some(&input)).unwrap();
/// let value = processed.output.into_value();
/// assert_eq!(value.get_path(&["port"]), Some(&ConfigValue::Integer(5432)));
///
/// let errors = Processor::process(&schema, "db", None).unwrap_err();
/// assert_eq!(errors[0].message(), "The mandatory item 'db.host' is missing.");
/// ```
#[derive(Clone, Debug)]
pub struct Expect {
    kind: Kind,
    default: Option<ConfigValue>,
    required: bool,
    nullable: bool,
    min: Option<f64>,
    max: Option<f64>,
    deprecated: Option<String>,
    assertions: Vec<Assertion>,
}

impl Expect {
    fn of(kind: Kind) -> Self {
        Self {
            kind,
            default: None,
            required: false,
            nullable: false,
            min: None,
            max: None,
            deprecated: None,
            assertions: Vec::new(),
        }
    }

    /// Accepts any value unchanged.
    pub fn any() -> Self {
        Self::of(Kind::Any)
    }

    /// Expects a string.
    pub fn string() -> Self {
        Self::of(Kind::String)
    }

    /// Expects an integer.
    pub fn int() -> Self {
        Self::of(Kind::Int)
    }

    /// Expects a number; integers are widened to floats.
    pub fn float() -> Self {
        Self::of(Kind::Float)
    }

    /// Expects a boolean.
    pub fn bool() -> Self {
        Self::of(Kind::Bool)
    }

    /// Expects a mapping with the given named items, in order.
    ///
    /// Items not listed are rejected unless [`Expect::other_items`] is set.
    pub fn structure<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Expect)>,
    {
        Self::of(Kind::Structure {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            other_items: None,
        })
    }

    /// Expects a list whose items all match `item`.
    pub fn list_of(item: Expect) -> Self {
        Self::of(Kind::ListOf(Box::new(item)))
    }

    /// Expects a mapping whose values all match `item`.
    pub fn map_of(item: Expect) -> Self {
        Self::of(Kind::MapOf(Box::new(item)))
    }

    /// Expects one of the given values.
    pub fn any_of<V, I>(values: I) -> Self
    where
        V: Into<ConfigValue>,
        I: IntoIterator<Item = V>,
    {
        Self::of(Kind::AnyOf(values.into_iter().map(Into::into).collect()))
    }

    /// Sets the value used when the item is missing.
    pub fn default(mut self, value: impl Into<ConfigValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Makes the item mandatory.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allows an explicit `null`.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the lower bound for numbers, string length, or item count.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the upper bound for numbers, string length, or item count.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Marks the item as deprecated.
    ///
    /// Supplying a value for it produces a warning. `%path%` in `message` is
    /// replaced with the item's path; an empty message uses a default text.
    pub fn deprecated(mut self, message: impl Into<String>) -> Self {
        self.deprecated = Some(message.into());
        self
    }

    /// Adds a custom check run against values that passed the type check.
    pub fn assert<F>(mut self, predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(&ConfigValue) -> bool + Send + Sync + 'static,
    {
        self.assertions.push(Assertion {
            predicate: Arc::new(predicate),
            description: description.into(),
        });
        self
    }

    /// Accepts items not listed in a structure, validating them with `schema`.
    ///
    /// Has no effect on non-structure schemas.
    pub fn other_items(mut self, schema: Expect) -> Self {
        if let Kind::Structure { other_items, .. } = &mut self.kind {
            *other_items = Some(Box::new(schema));
        }
        self
    }

    fn expected(&self) -> String {
        let base = match &self.kind {
            Kind::Any => "mixed".to_string(),
            Kind::String => "string".to_string(),
            Kind::Int => "int".to_string(),
            Kind::Float => "float".to_string(),
            Kind::Bool => "bool".to_string(),
            Kind::Structure { .. } | Kind::MapOf(_) => "array".to_string(),
            Kind::ListOf(_) => "list".to_string(),
            Kind::AnyOf(values) => values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("|"),
        };
        if self.nullable {
            format!("{}|null", base)
        } else {
            base
        }
    }

    fn complete_missing(&self, context: &mut ProcessContext) -> SchemaOutput {
        if self.required {
            let path = context.path();
            context.add_error(format!("The mandatory item '{}' is missing.", path));
            return SchemaOutput::Scalar(ConfigValue::Null);
        }

        match (&self.kind, &self.default) {
            (Kind::Structure { .. }, Some(ConfigValue::Mapping(map))) => {
                self.process_structure(map, context)
            }
            (Kind::Structure { .. }, _) => self.process_structure(&ConfigMap::new(), context),
            (_, Some(default)) => SchemaOutput::Scalar(default.clone()),
            (Kind::ListOf(_), None) => SchemaOutput::Sequence(Vec::new()),
            (Kind::MapOf(_), None) => SchemaOutput::Mapping(Vec::new()),
            (_, None) => SchemaOutput::Scalar(ConfigValue::Null),
        }
    }

    fn type_error(&self, value: &ConfigValue, context: &mut ProcessContext) -> SchemaOutput {
        let path = context.path();
        context.add_error(format!(
            "The item '{}' expects to be {}, {} given.",
            path,
            self.expected(),
            describe(value)
        ));
        SchemaOutput::Scalar(ConfigValue::Null)
    }

    fn check_range(&self, measured: f64, what: &str, context: &mut ProcessContext) {
        let below = self.min.is_some_and(|min| measured < min);
        let above = self.max.is_some_and(|max| measured > max);
        if !(below || above) {
            return;
        }

        let range = format!(
            "{}..{}",
            self.min.map(format_bound).unwrap_or_default(),
            self.max.map(format_bound).unwrap_or_default()
        );
        let path = context.path();
        let subject = if what.is_empty() {
            format!("The item '{}'", path)
        } else {
            format!("The {} of item '{}'", what, path)
        };
        context.add_error(format!(
            "{} expects to be in range {}, {} given.",
            subject,
            range,
            format_bound(measured)
        ));
    }

    fn process_structure(&self, map: &ConfigMap, context: &mut ProcessContext) -> SchemaOutput {
        let Kind::Structure {
            fields,
            other_items,
        } = &self.kind
        else {
            return SchemaOutput::Mapping(Vec::new());
        };

        let mut entries = Vec::with_capacity(fields.len());
        for (name, schema) in fields {
            let output = context.within(name, |context| schema.process(map.get(name), context));
            entries.push((name.clone(), output));
        }

        for (key, value) in map {
            if fields.iter().any(|(name, _)| name == key) {
                continue;
            }
            match other_items {
                Some(schema) => {
                    let output =
                        context.within(key, |context| schema.process(Some(value), context));
                    entries.push((key.clone(), output));
                }
                None => {
                    let path = context.path();
                    let item = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    context.add_error(format!("Unexpected item '{}'.", item));
                }
            }
        }

        SchemaOutput::Mapping(entries)
    }

    fn process_value(&self, value: &ConfigValue, context: &mut ProcessContext) -> SchemaOutput {
        match (&self.kind, value) {
            (Kind::Any, v) => SchemaOutput::Scalar(v.clone()),
            (Kind::String, ConfigValue::String(s)) => {
                self.check_range(s.chars().count() as f64, "length", context);
                SchemaOutput::Scalar(value.clone())
            }
            (Kind::Int, ConfigValue::Integer(n)) => {
                self.check_range(*n as f64, "", context);
                SchemaOutput::Scalar(value.clone())
            }
            (Kind::Float, ConfigValue::Float(f)) => {
                self.check_range(*f, "", context);
                SchemaOutput::Scalar(value.clone())
            }
            (Kind::Float, ConfigValue::Integer(n)) => {
                self.check_range(*n as f64, "", context);
                SchemaOutput::Scalar(ConfigValue::Float(*n as f64))
            }
            (Kind::Bool, ConfigValue::Bool(_)) => SchemaOutput::Scalar(value.clone()),
            (Kind::AnyOf(values), v) if values.contains(v) => SchemaOutput::Scalar(v.clone()),
            (Kind::Structure { .. }, ConfigValue::Mapping(map)) => {
                self.check_range(map.len() as f64, "size", context);
                self.process_structure(map, context)
            }
            (Kind::ListOf(item), ConfigValue::Sequence(items)) => {
                self.check_range(items.len() as f64, "size", context);
                SchemaOutput::Sequence(
                    items
                        .iter()
                        .enumerate()
                        .map(|(index, v)| {
                            context.within(&index.to_string(), |context| {
                                item.process(Some(v), context)
                            })
                        })
                        .collect(),
                )
            }
            (Kind::MapOf(item), ConfigValue::Mapping(map)) => {
                self.check_range(map.len() as f64, "size", context);
                SchemaOutput::Mapping(
                    map.iter()
                        .map(|(key, v)| {
                            let output =
                                context.within(key, |context| item.process(Some(v), context));
                            (key.clone(), output)
                        })
                        .collect(),
                )
            }
            (_, v) => self.type_error(v, context),
        }
    }
}

impl Schema for Expect {
    fn process(&self, value: Option<&ConfigValue>, context: &mut ProcessContext) -> SchemaOutput {
        let Some(value) = value else {
            return self.complete_missing(context);
        };

        if let Some(message) = &self.deprecated {
            let path = context.path();
            let warning = if message.is_empty() {
                format!("The item '{}' is deprecated.", path)
            } else {
                message.replace("%path%", &path)
            };
            context.add_warning(warning);
        }

        if value.is_null() {
            if self.nullable {
                return SchemaOutput::Scalar(ConfigValue::Null);
            }
            if self.default.is_some()
                || matches!(
                    self.kind,
                    Kind::Structure { .. } | Kind::ListOf(_) | Kind::MapOf(_)
                )
            {
                return self.complete_missing(context);
            }
            if !matches!(self.kind, Kind::Any) {
                return self.type_error(value, context);
            }
        }

        let errors_before = context.error_count();
        let output = self.process_value(value, context);
        if context.error_count() > errors_before {
            return output;
        }

        for assertion in &self.assertions {
            if !(assertion.predicate)(value) {
                let path = context.path();
                context.add_error(format!(
                    "Failed assertion '{}' for item '{}' with value {}.",
                    assertion.description, path, value
                ));
            }
        }

        output
    }
}

fn describe(value: &ConfigValue) -> String {
    if value.is_container() || value.is_null() {
        value.type_name().to_string()
    } else {
        format!("{} {}", value.type_name(), value)
    }
}

fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        format!("{}", bound)
    }
}
