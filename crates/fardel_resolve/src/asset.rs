//! Resolution input and output types.

use std::path::{Path, PathBuf};

/// A module reference as requested by importing code.
///
/// Transient: consumed by the resolver and never stored in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReference {
    /// The string requested by the importing code, e.g. `./util` or `lodash/map`.
    pub request: String,
    /// The absolute directory the request was made from.
    pub context_dir: PathBuf,
}

impl ModuleReference {
    /// Creates a reference from a request string and its context directory.
    pub fn new(request: impl Into<String>, context_dir: impl Into<PathBuf>) -> Self {
        Self {
            request: request.into(),
            context_dir: context_dir.into(),
        }
    }
}

/// The output of resolution: an absolute file identity plus namespace metadata.
///
/// Immutable once produced. The absolute path is the process-wide unique
/// identity key for the module; the canonical URI (`namespace:relative_path`)
/// is what hash inputs and error messages use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Absolute path of the resolved file.
    pub path: PathBuf,
    /// The namespace (logical package) the file belongs to.
    pub namespace: String,
    /// Path of the file relative to the namespace root, with `/` separators.
    pub relative_path: String,
    /// Absolute path of the namespace root directory.
    pub namespace_root: PathBuf,
    /// Canonical URI: `namespace:relative_path`.
    pub uri: String,
}

impl ResolvedAsset {
    /// Builds an asset for `path` inside the given namespace.
    pub fn new(path: PathBuf, namespace: &str, namespace_root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(namespace_root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        let uri = format!("{namespace}:{relative_path}");
        Self {
            path,
            namespace: namespace.to_string(),
            relative_path,
            namespace_root: namespace_root.to_path_buf(),
            uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_joins_namespace_and_relative_path() {
        let asset = ResolvedAsset::new(
            PathBuf::from("/proj/src/util.js"),
            "app",
            Path::new("/proj"),
        );
        assert_eq!(asset.relative_path, "src/util.js");
        assert_eq!(asset.uri, "app:src/util.js");
    }

    #[test]
    fn path_outside_root_kept_verbatim() {
        let asset = ResolvedAsset::new(
            PathBuf::from("/other/x.js"),
            "app",
            Path::new("/proj"),
        );
        assert_eq!(asset.relative_path, "/other/x.js");
    }
}
