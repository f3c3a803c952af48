//! Configuration types deserialized from `fardel.toml`.

use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level project configuration parsed from `fardel.toml`.
///
/// Contains project metadata, resolver settings, output settings, and the
/// declared bundle roots. Bundles are stored in a `BTreeMap` so iteration
/// order (and therefore partitioning order) is stable across runs.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, version).
    pub project: ProjectMeta,
    /// Module resolution settings (extensions, package directories).
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Output settings (destination directory, implicit bundle template).
    #[serde(default)]
    pub output: OutputConfig,
    /// Named bundle declarations, keyed by bundle name.
    #[serde(default)]
    pub bundles: BTreeMap<String, BundleDecl>,
}

/// Core project metadata required in every `fardel.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    pub version: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
    /// List of project authors.
    #[serde(default)]
    pub authors: Vec<String>,
}

/// Module resolution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// File extensions tried, in order, when a literal path does not exist.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Name of the package-container folder searched when resolving bare names.
    #[serde(default = "default_package_dirs")]
    pub package_dirs: String,
    /// Filename of the package descriptor declaring a "main" entry.
    #[serde(default = "default_descriptor")]
    pub descriptor: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            package_dirs: default_package_dirs(),
            descriptor: default_descriptor(),
        }
    }
}

/// Output settings for rendered bundle artifacts.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Destination directory for rendered bundles, relative to the project root.
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Destination template used for implicit bundles created by splitting.
    #[serde(default = "default_implicit_template")]
    pub implicit_template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            implicit_template: default_implicit_template(),
        }
    }
}

/// A declared bundle root: an entry point or a split point.
///
/// Exactly one of `entry` and `split` must be set. Entry bundles pull in the
/// module-loading runtime and the URL table; split bundles are lazily
/// loadable subtrees and never carry the runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleDecl {
    /// Module reference for an entry-point bundle.
    #[serde(default)]
    pub entry: Option<String>,
    /// Module reference for a split-point bundle.
    #[serde(default)]
    pub split: Option<String>,
    /// Destination filename template. May contain `[setHash]`, `[bundleHash]`
    /// / `[hash]`, and `[primaryModuleHash]` placeholders.
    pub dest: String,
    /// Suppresses the runtime preamble for an entry bundle.
    #[serde(default)]
    pub exclude_runtime: bool,
}

fn default_extensions() -> Vec<String> {
    vec![".js".to_string()]
}

fn default_package_dirs() -> String {
    "node_modules".to_string()
}

fn default_descriptor() -> String {
    "package.json".to_string()
}

fn default_output_dir() -> String {
    "dist".to_string()
}

fn default_implicit_template() -> String {
    "chunk.[setHash].js".to_string()
}
