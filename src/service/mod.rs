// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration store.
//!
//! [`Configuration`] implements every public capability trait;
//! [`ReadOnlyConfiguration`] narrows it down to reading, and
//! [`ConfigurationBuilder`] assembles one from schemas and sources.

pub mod builder;
pub mod configuration;
pub mod read_only;

// Re-export commonly used types
pub use builder::ConfigurationBuilder;
pub use configuration::Configuration;
pub use read_only::ReadOnlyConfiguration;
