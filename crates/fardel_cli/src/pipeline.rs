//! Shared helpers for CLI commands: project root resolution and mapping
//! the declared bundle table onto bundle specs.

use std::path::{Path, PathBuf};

use fardel_bundle::BundleSpec;
use fardel_config::ProjectConfig;
use fardel_resolve::ModuleReference;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing
/// `fardel.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join("fardel.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find fardel.toml in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` is specified, uses that path (file → parent dir, dir →
/// itself). Otherwise walks up from the current directory.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_file() {
            Ok(p.parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")))
        } else {
            Ok(p)
        }
    } else {
        find_project_root(&std::env::current_dir()?)
    }
}

/// Maps the config's bundle table onto bundle specs, seeded from the
/// project root. The table is a `BTreeMap`, so spec order is stable.
pub fn bundle_specs(config: &ProjectConfig, project_root: &Path) -> Vec<BundleSpec> {
    config
        .bundles
        .iter()
        .map(|(name, decl)| {
            // Validation guarantees exactly one of entry/split is set.
            let (request, is_entry_point) = match (&decl.entry, &decl.split) {
                (Some(entry), _) => (entry.clone(), true),
                (None, Some(split)) => (split.clone(), false),
                (None, None) => (String::new(), false),
            };
            BundleSpec {
                name: name.clone(),
                reference: ModuleReference::new(request, project_root),
                dest_template: decl.dest.clone(),
                is_entry_point,
                exclude_runtime: decl.exclude_runtime || !is_entry_point,
            }
        })
        .collect()
}
