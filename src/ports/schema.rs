// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema trait definition.
//!
//! This module defines the contract between the configuration store and the
//! validator it delegates to. A [`Schema`] receives the raw value of one item
//! (or `None` when the item is absent), reports errors and warnings through a
//! [`ProcessContext`], and returns its normalized output as a [`SchemaOutput`]
//! tree. The [`Processor`] runs a schema for one namespace and turns the
//! collected diagnostics into a single outcome.

use crate::domain::{ConfigMap, ConfigValue, ValidationMessage};
use std::sync::Arc;

/// A validation and normalization rule set for one configuration item.
///
/// Implementations must not stop at the first problem: every violation should
/// be reported through [`ProcessContext::add_error`] so that callers can list
/// all of them at once.
///
/// # Examples
///
/// ```rust
/// use schemacfg::domain::ConfigValue;
/// use schemacfg::ports::{ProcessContext, Processor, Schema, SchemaOutput};
///
/// /// Accepts any string, defaulting to "localhost".
/// struct Host;
///
/// impl Schema for Host {
///     fn process(
///         &self,
///         value: Option<&ConfigValue>,
///         context: &mut ProcessContext,
///     ) -> SchemaOutput {
///         match value {
///             None => SchemaOutput::Scalar(ConfigValue::from("localhost")),
///             Some(ConfigValue::String(s)) => SchemaOutput::Scalar(ConfigValue::from(s.as_str())),
///             Some(other) => {
///                 let message = format!(
///                     "'{}' must be a string, {} given",
///                     context.path(),
///                     other.type_name()
///                 );
///                 context.add_error(message);
///                 SchemaOutput::Scalar(ConfigValue::Null)
///             }
///         }
///     }
/// }
///
/// let processed = Processor::process(&Host, "host", None).unwrap();
/// assert_eq!(processed.output.into_value(), ConfigValue::from("localhost"));
///
/// let errors = Processor::process(&Host, "host", Some(&ConfigValue::from(1))).unwrap_err();
/// assert_eq!(errors[0].path(), "host");
/// ```
pub trait Schema: Send + Sync {
    /// Validates and normalizes `value`.
    ///
    /// `value` is `None` when the item is missing from the input; the schema
    /// decides whether that is an error or whether a default applies.
    fn process(&self, value: Option<&ConfigValue>, context: &mut ProcessContext) -> SchemaOutput;
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn process(&self, value: Option<&ConfigValue>, context: &mut ProcessContext) -> SchemaOutput {
        (**self).process(value, context)
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn process(&self, value: Option<&ConfigValue>, context: &mut ProcessContext) -> SchemaOutput {
        (**self).process(value, context)
    }
}

/// Output tree produced by a schema.
///
/// Mappings keep the order in which the schema produced their entries; a
/// later entry with the same name replaces an earlier one once the tree is
/// converted into a [`ConfigValue`].
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaOutput {
    /// A leaf, stored as-is.
    Scalar(ConfigValue),
    /// A list of processed items.
    Sequence(Vec<SchemaOutput>),
    /// Named processed items.
    Mapping(Vec<(String, SchemaOutput)>),
}

impl SchemaOutput {
    /// Converts the output into a plain configuration tree.
    pub fn into_value(self) -> ConfigValue {
        match self {
            SchemaOutput::Scalar(value) => value,
            SchemaOutput::Sequence(items) => {
                ConfigValue::Sequence(items.into_iter().map(SchemaOutput::into_value).collect())
            }
            SchemaOutput::Mapping(entries) => ConfigValue::Mapping(
                entries
                    .into_iter()
                    .map(|(key, item)| (key, item.into_value()))
                    .collect::<ConfigMap>(),
            ),
        }
    }
}

impl From<ConfigValue> for SchemaOutput {
    fn from(value: ConfigValue) -> Self {
        SchemaOutput::Scalar(value)
    }
}

/// Diagnostics accumulated while a schema runs.
///
/// The context tracks the path of the item currently being processed so that
/// schemas can produce messages that point at the offending item.
#[derive(Debug, Default)]
pub struct ProcessContext {
    path: Vec<String>,
    errors: Vec<ValidationMessage>,
    warnings: Vec<String>,
}

impl ProcessContext {
    /// Creates an empty context rooted at the top of the tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dot-delimited path of the current item.
    pub fn path(&self) -> String {
        self.path.join(".")
    }

    /// Runs `f` with `segment` appended to the current path.
    pub fn within<T>(&mut self, segment: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment.to_string());
        let result = f(self);
        self.path.pop();
        result
    }

    /// Records a validation error for the current item.
    pub fn add_error(&mut self, message: impl Into<String>) {
        let path = self.path();
        self.errors.push(ValidationMessage::new(path, message));
    }

    /// Records a non-fatal warning, such as a deprecation notice.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Returns `true` if any error has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the number of errors recorded so far.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the warnings recorded so far.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Successful outcome of running a schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Processed {
    /// Normalized output.
    pub output: SchemaOutput,
    /// Non-fatal warnings raised by the schema.
    pub warnings: Vec<String>,
}

/// Runs schemas scoped to a single namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Processor;

impl Processor {
    /// Processes `input` with `schema` as the item named `namespace`.
    ///
    /// Paths reported by the schema are prefixed with the namespace, exactly
    /// as if the schema had been applied to `{namespace: input}`.
    ///
    /// # Errors
    ///
    /// Returns every recorded [`ValidationMessage`] if the schema reported at
    /// least one error. Warnings are dropped in that case.
    pub fn process(
        schema: &dyn Schema,
        namespace: &str,
        input: Option<&ConfigValue>,
    ) -> std::result::Result<Processed, Vec<ValidationMessage>> {
        let mut context = ProcessContext::new();
        let output = context.within(namespace, |context| schema.process(input, context));

        if context.has_errors() {
            return Err(context.errors);
        }

        Ok(Processed {
            output,
            warnings: context.warnings,
        })
    }
}
