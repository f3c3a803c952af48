//! The two-mode resolution algorithm.
//!
//! Relative/absolute references resolve against the context directory:
//! literal file, then each configured extension, then directory resolution
//! (package descriptor `main`, else an `index` file). Bare names search the
//! package-container folders found by walking from the context directory up
//! to the filesystem root, nearest-first; the first container where the name
//! resolves becomes the namespace root.

use std::path::{Component, Path, PathBuf};

use fardel_config::ResolverConfig;

use crate::asset::{ModuleReference, ResolvedAsset};
use crate::error::ResolveError;

/// Maps module references to resolved assets.
///
/// Holds the resolution settings from configuration. Resolution is pure:
/// it only performs filesystem existence and type checks.
#[derive(Debug, Clone)]
pub struct Resolver {
    extensions: Vec<String>,
    package_dir: String,
    descriptor: String,
}

impl Resolver {
    /// Creates a resolver from resolver configuration.
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            package_dir: config.package_dirs.clone(),
            descriptor: config.descriptor.clone(),
        }
    }

    /// Resolves a reference made from within the given namespace.
    ///
    /// `namespace` and `namespace_root` describe the requesting module's
    /// namespace; a relative request stays in it, while a bare-name request
    /// opens a new namespace named after the request's first path segment.
    pub fn resolve(
        &self,
        reference: &ModuleReference,
        namespace: &str,
        namespace_root: &Path,
    ) -> Result<ResolvedAsset, ResolveError> {
        if is_path_request(&reference.request) {
            let candidate = normalize(&reference.context_dir.join(&reference.request));
            if let Some(path) = self.resolve_path(&candidate) {
                return Ok(ResolvedAsset::new(path, namespace, namespace_root));
            }
        } else {
            let first_segment = reference
                .request
                .split('/')
                .next()
                .unwrap_or(&reference.request);
            for ancestor in reference.context_dir.ancestors() {
                let container = ancestor.join(&self.package_dir);
                if !container.is_dir() {
                    continue;
                }
                if let Some(path) = self.resolve_path(&normalize(&container.join(&reference.request)))
                {
                    let package_root = container.join(first_segment);
                    return Ok(ResolvedAsset::new(path, first_segment, &package_root));
                }
            }
        }
        Err(ResolveError::NotFound {
            request: reference.request.clone(),
            context_dir: reference.context_dir.clone(),
        })
    }

    /// Resolves a filesystem candidate: literal file, extension-appended
    /// file, or directory (descriptor `main`, else `index`).
    fn resolve_path(&self, candidate: &Path) -> Option<PathBuf> {
        if candidate.is_file() {
            return Some(candidate.to_path_buf());
        }
        for ext in &self.extensions {
            let mut with_ext = candidate.to_path_buf().into_os_string();
            with_ext.push(ext);
            let with_ext = PathBuf::from(with_ext);
            if with_ext.is_file() {
                return Some(with_ext);
            }
        }
        if candidate.is_dir() {
            if let Some(main) = self.descriptor_main(candidate) {
                if let Some(path) = self.resolve_path(&normalize(&candidate.join(&main))) {
                    return Some(path);
                }
            }
            for ext in &self.extensions {
                let index = candidate.join(format!("index{ext}"));
                if index.is_file() {
                    return Some(index);
                }
            }
        }
        None
    }

    /// Reads the `main` entry from a directory's package descriptor.
    ///
    /// A missing, unreadable, or malformed descriptor is treated as having
    /// no `main`; resolution falls back to the `index` file.
    fn descriptor_main(&self, dir: &Path) -> Option<String> {
        let descriptor_path = dir.join(&self.descriptor);
        let content = std::fs::read_to_string(descriptor_path).ok()?;
        let value: serde_json::Value = serde_json::from_str(&content).ok()?;
        value.get("main")?.as_str().map(str::to_string)
    }
}

/// Returns `true` for relative/absolute path syntax (`/`, `./`, `../`).
fn is_path_request(request: &str) -> bool {
    request.starts_with('/') || request.starts_with("./") || request.starts_with("../")
}

/// Lexically normalizes a path: removes `.` components and folds `..` into
/// their parent. Identity keys must be unique per file, so two spellings of
/// the same path have to normalize identically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(Component::ParentDir);
                }
            }
            other => out.push(other),
        }
    }
    out
}
