//! Incremental recompilation.
//!
//! A long-lived [`Recompiler`] owns the module graph, the bundle specs, and
//! the last good compilation. File changes evict the changed module and
//! every transitive dependent from the graph, rebuild only what was
//! evicted (cached modules are reused by path), and re-run partitioning
//! and rendering over the patched graph. A failed rebuild leaves the last
//! good compilation in place.

#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod index;
pub mod recompiler;
pub mod state;

pub use error::CompileError;
pub use events::{CollectedEvents, CompileEvent, EventSink, NullSink};
pub use index::DependentIndex;
pub use recompiler::Recompiler;
pub use state::CompileState;
