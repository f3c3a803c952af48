//! Recompiler lifecycle state.

/// Where the recompiler is in its change/rebuild cycle.
///
/// `Invalidated` also covers a failed rebuild attempt: the evicted modules
/// have not been rebuilt, so the pending changes are still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileState {
    /// No outstanding changes; the exposed compilation is current.
    Idle,
    /// Changes were recorded but not yet rebuilt.
    Invalidated,
    /// A rebuild is running.
    Rebuilding,
}
