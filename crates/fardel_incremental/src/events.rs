//! Compilation lifecycle events.

use std::path::PathBuf;
use std::sync::Arc;

use fardel_bundle::Bundle;
use fardel_graph::Module;

/// One event in the compile lifecycle, in emission order:
/// `Invalidated`* then `Patch` then `Completed`, or `Failed` instead of
/// the latter two when a rebuild attempt errors.
#[derive(Debug, Clone)]
pub enum CompileEvent {
    /// Modules evicted from the graph ahead of a rebuild.
    Invalidated {
        /// The evicted module paths, the changed file first.
        paths: Vec<PathBuf>,
    },
    /// Modules newly built by the rebuild, in completion order.
    Patch {
        /// The new modules.
        modules: Vec<Arc<Module>>,
    },
    /// The rebuild finished; these are the current bundles.
    Completed {
        /// The full bundle list of the new compilation.
        bundles: Vec<Bundle>,
    },
    /// The rebuild attempt failed; the prior compilation stays current.
    Failed {
        /// Rendered error message.
        message: String,
    },
}

/// Receiver for compile events. The dev-server and watcher integrations
/// live outside this crate; they plug in here.
pub trait EventSink {
    /// Called once per event, in order.
    fn emit(&mut self, event: CompileEvent);
}

/// An [`EventSink`] that keeps every event. Useful in tests and for
/// polling consumers.
#[derive(Debug, Default)]
pub struct CollectedEvents {
    /// The events received so far, oldest first.
    pub events: Vec<CompileEvent>,
}

impl CollectedEvents {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for CollectedEvents {
    fn emit(&mut self, event: CompileEvent) {
        self.events.push(event);
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: CompileEvent) {}
}
