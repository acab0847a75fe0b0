// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) through which the store
//! talks to its collaborators: the schemas it delegates validation to and the
//! sources that supply raw values. These traits are implemented by adapters in
//! the adapters layer.

pub mod parser;
pub mod schema;
pub mod source;

// Re-export commonly used types
pub use parser::ConfigParser;
pub use schema::{ProcessContext, Processed, Processor, Schema, SchemaOutput};
pub use source::ConfigSource;
