//! Declared bundle inputs.

use fardel_resolve::ModuleReference;

/// One declared bundle: a named seed plus emission options.
///
/// Entry bundles carry the module-loading runtime and start executing their
/// root module on load; split bundles are declared seeds that own their
/// subtree but ship without the runtime.
#[derive(Debug, Clone)]
pub struct BundleSpec {
    /// Declared bundle name, used in summaries and implicit-bundle labels.
    pub name: String,
    /// The seed module reference, resolved from the project root.
    pub reference: ModuleReference,
    /// Destination template with `[setHash]`/`[bundleHash]`/`[hash]` and
    /// `[primaryModuleHash]` placeholders.
    pub dest_template: String,
    /// Whether the emitted artifact boots its root module on load.
    pub is_entry_point: bool,
    /// Suppresses the runtime preamble even for an entry bundle.
    pub exclude_runtime: bool,
}

impl BundleSpec {
    /// Convenience constructor for an entry bundle.
    pub fn entry(
        name: impl Into<String>,
        reference: ModuleReference,
        dest_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reference,
            dest_template: dest_template.into(),
            is_entry_point: true,
            exclude_runtime: false,
        }
    }

    /// Convenience constructor for a declared split point.
    pub fn split(
        name: impl Into<String>,
        reference: ModuleReference,
        dest_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reference,
            dest_template: dest_template.into(),
            is_entry_point: false,
            exclude_runtime: true,
        }
    }
}
