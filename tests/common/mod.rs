// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for integration tests.

use schemacfg::prelude::*;
use schemacfg::ports::{ProcessContext, SchemaOutput};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Wraps a schema and counts how many times it runs.
#[allow(dead_code)]
pub struct CountingSchema {
    inner: Expect,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingSchema {
    /// Returns the schema and a handle to its call counter.
    pub fn new(inner: Expect) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let schema = Self {
            inner,
            calls: Arc::clone(&calls),
        };
        (schema, calls)
    }
}

impl Schema for CountingSchema {
    fn process(&self, value: Option<&ConfigValue>, context: &mut ProcessContext) -> SchemaOutput {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.process(value, context)
    }
}

/// Returns the current value of a call counter.
#[allow(dead_code)]
pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

/// A source with fixed values and priority.
#[allow(dead_code)]
pub struct MockConfigSource {
    name: String,
    priority: u8,
    values: ConfigMap,
}

#[allow(dead_code)]
impl MockConfigSource {
    pub fn new(name: &str, priority: u8, values: ConfigMap) -> Self {
        Self {
            name: name.to_string(),
            priority,
            values,
        }
    }
}

impl ConfigSource for MockConfigSource {
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

/// Writes `content` to a temporary YAML file that lives as long as the handle.
#[allow(dead_code)]
pub fn create_temp_yaml(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Builds a single-entry map.
#[allow(dead_code)]
pub fn map(key: &str, value: ConfigValue) -> ConfigMap {
    let mut map = ConfigMap::new();
    map.insert(key.to_string(), value);
    map
}

/// The `db` schema used throughout the tests.
#[allow(dead_code)]
pub fn db_schema() -> Expect {
    Expect::structure([
        ("host", Expect::string()),
        ("port", Expect::int().default(5432)),
    ])
}
