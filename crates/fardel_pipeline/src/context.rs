//! Per-invocation operation context with copy-on-write isolation.

use std::collections::HashMap;

/// The mutable part of an operation invocation's context.
///
/// Plugins use the scratch map to carry state between an override and a
/// later transform of the same invocation, or down into nested operation
/// calls. Each invocation works on a [`fork`](OpContext::fork) of its
/// parent's context: mutations performed inside an invocation are visible
/// along that invocation's own chain (and to operations it calls), but never
/// to the parent after the call returns, and never to siblings.
#[derive(Debug, Clone, Default)]
pub struct OpContext {
    scratch: HashMap<String, serde_json::Value>,
}

impl OpContext {
    /// Creates an empty root context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forks this context for a child invocation.
    ///
    /// The child starts with a copy of the current scratch state and owns
    /// it exclusively from then on.
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// Reads a scratch value.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.scratch.get(key)
    }

    /// Writes a scratch value, returning the previous one if present.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<serde_json::Value> {
        self.scratch.insert(key.into(), value)
    }
}
