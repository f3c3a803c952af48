//! Artifact rendering and emission.
//!
//! Each bundle becomes one artifact. Modules are emitted keyed by content
//! hash, in hash order; an entry bundle is prefixed with the module-loading
//! runtime and a URL table mapping every bundle's `set_hash` to its
//! destination, and suffixed with the boot call for its root module.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use fardel_graph::ModuleGraph;

use crate::bundle::Bundle;
use crate::error::BundleError;

/// The module-loading runtime shipped at the top of entry bundles.
const RUNTIME: &str = "\
var fardel = fardel || (function () {
    var modules = {};
    var urls = {};
    var cache = {};
    function load(hash) {
        if (cache[hash]) { return cache[hash].exports; }
        var module = cache[hash] = { exports: {} };
        modules[hash](load, module, module.exports);
        return module.exports;
    }
    return { modules: modules, urls: urls, require: load };
}());
";

/// One emitted file.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// The artifact's code.
    pub code: String,
    /// Concatenated source map, when the adapter produces one.
    pub source_map: Option<String>,
}

/// The output of one compilation: destination path to artifact, plus the
/// bundles behind them for incremental reuse.
#[derive(Debug, Clone)]
pub struct CompilationResult {
    /// Artifacts keyed by destination path, relative to the output dir.
    pub artifacts: BTreeMap<String, Artifact>,
    /// The bundles the artifacts were rendered from.
    pub bundles: Vec<Bundle>,
}

/// Renders every bundle into its artifact.
pub fn render(bundles: &[Bundle], graph: &ModuleGraph) -> Result<CompilationResult, BundleError> {
    let mut artifacts = BTreeMap::new();
    for bundle in bundles {
        let mut code = String::new();
        let mut source_map: Option<String> = None;

        if bundle.include_runtime {
            code.push_str(RUNTIME);
            for other in bundles {
                code.push_str(&format!(
                    "fardel.urls[{}] = {};\n",
                    js_str(&other.set_hash.to_hex()),
                    js_str(&other.dest),
                ));
            }
        }

        for hash in &bundle.module_hashes {
            let module = graph
                .by_hash(hash)
                .ok_or(BundleError::MissingModule { hash: *hash })?;
            let rendered = module.ast.render();
            code.push_str(&format!(
                "fardel.modules[{}] = function (require, module, exports) {{\n{}\n}};\n",
                js_str(&hash.to_hex()),
                rendered.code,
            ));
            if let Some(map) = rendered.source_map {
                source_map.get_or_insert_with(String::new).push_str(&map);
            }
        }

        if bundle.is_entry_point {
            if let Some(root) = &bundle.root {
                code.push_str(&format!("fardel.require({});\n", js_str(&root.to_hex())));
            }
        }

        artifacts.insert(bundle.dest.clone(), Artifact { code, source_map });
    }
    Ok(CompilationResult {
        artifacts,
        bundles: bundles.to_vec(),
    })
}

/// Writes every artifact under `out_dir`, creating parent directories as
/// needed. Returns the written paths.
pub fn write_artifacts(
    result: &CompilationResult,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, BundleError> {
    let mut written = Vec::with_capacity(result.artifacts.len());
    for (dest, artifact) in &result.artifacts {
        let path = out_dir.join(dest);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| BundleError::Write {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, &artifact.code).map_err(|source| BundleError::Write {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}

/// A JS string literal. JSON string escaping is a subset of JS.
fn js_str(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::partition;
    use crate::spec::BundleSpec;
    use fardel_codegen::{Ast, Segment};
    use fardel_common::ContentHash;
    use fardel_graph::Module;
    use fardel_resolve::ModuleReference;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn module(root: &Path, name: &str, deps: &[&Arc<Module>]) -> Arc<Module> {
        let mut deep = BTreeSet::new();
        for dep in deps {
            deep.insert(dep.hash);
            deep.extend(dep.deep_dependencies.iter().copied());
        }
        Arc::new(Module {
            path: root.join(format!("{name}.js")),
            namespace: "app".to_string(),
            relative_path: format!("{name}.js"),
            uri: format!("app:{name}.js"),
            source: format!("// {name}"),
            ast: Ast::new(
                format!("app:{name}.js"),
                vec![Segment::Text(format!("// {name}"))],
                Vec::new(),
            ),
            dependencies: deps.iter().map(|dep| dep.hash).collect(),
            deep_dependencies: deep,
            hash: ContentHash::from_bytes(name.as_bytes()),
        })
    }

    fn shared_tree() -> (ModuleGraph, Vec<BundleSpec>, Vec<PathBuf>) {
        let root = Path::new("/proj");
        let mut graph = ModuleGraph::new();
        let shared = module(root, "shared", &[]);
        let a = module(root, "a", &[&shared]);
        let b = module(root, "b", &[&shared]);
        for m in [&shared, &a, &b] {
            graph.insert(m.clone());
        }
        let specs = vec![
            BundleSpec::entry("a", ModuleReference::new("./a.js", root), "a.[hash].js"),
            BundleSpec::entry("b", ModuleReference::new("./b.js", root), "b.[hash].js"),
        ];
        let roots = vec![root.join("a.js"), root.join("b.js")];
        (graph, specs, roots)
    }

    #[test]
    fn entry_artifact_carries_runtime_url_table_and_boot() {
        let (graph, specs, roots) = shared_tree();
        let bundles = partition(&specs, &roots, &graph, "chunk.[setHash].js").unwrap();
        let result = render(&bundles, &graph).unwrap();
        assert_eq!(result.artifacts.len(), 3);

        let entry = bundles.iter().find(|b| b.name == "a").unwrap();
        let code = &result.artifacts[&entry.dest].code;
        assert!(code.starts_with("var fardel ="));
        // Every bundle's destination is in the URL table.
        for bundle in &bundles {
            assert!(code.contains(&bundle.dest));
            assert!(code.contains(&bundle.set_hash.to_hex()));
        }
        assert!(code.contains(&format!(
            "fardel.require(\"{}\");",
            entry.root.unwrap().to_hex()
        )));
    }

    #[test]
    fn implicit_artifact_has_no_runtime() {
        let (graph, specs, roots) = shared_tree();
        let bundles = partition(&specs, &roots, &graph, "chunk.[setHash].js").unwrap();
        let result = render(&bundles, &graph).unwrap();

        let implicit = bundles.iter().find(|b| b.root.is_none()).unwrap();
        let code = &result.artifacts[&implicit.dest].code;
        assert!(!code.contains("var fardel ="));
        assert!(!code.contains("fardel.require("));
        assert!(code.contains("fardel.modules["));
    }

    #[test]
    fn modules_emitted_in_hash_order() {
        let (graph, specs, roots) = shared_tree();
        let bundles = partition(&specs, &roots, &graph, "chunk.[setHash].js").unwrap();
        let result = render(&bundles, &graph).unwrap();

        for bundle in &bundles {
            let code = &result.artifacts[&bundle.dest].code;
            let positions: Vec<usize> = bundle
                .module_hashes
                .iter()
                .map(|hash| code.find(&hash.to_hex()).unwrap())
                .collect();
            let mut sorted = positions.clone();
            sorted.sort_unstable();
            assert_eq!(positions, sorted);
        }
    }

    #[test]
    fn write_artifacts_creates_parent_directories() {
        let root = Path::new("/proj");
        let mut graph = ModuleGraph::new();
        let a = module(root, "a", &[]);
        graph.insert(a.clone());
        let specs = vec![BundleSpec::entry(
            "a",
            ModuleReference::new("./a.js", root),
            "js/nested/a.[hash].js",
        )];
        let roots = vec![root.join("a.js")];
        let bundles = partition(&specs, &roots, &graph, "chunk.[setHash].js").unwrap();
        let result = render(&bundles, &graph).unwrap();

        let out = tempfile::tempdir().unwrap();
        let written = write_artifacts(&result, out.path()).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].starts_with(out.path().join("js/nested")));
        let on_disk = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(on_disk, result.artifacts[&bundles[0].dest].code);
    }
}
