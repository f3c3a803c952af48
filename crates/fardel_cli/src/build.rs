//! The `fardel build` command.

use fardel_bundle::write_artifacts;
use fardel_config::load_config;
use fardel_incremental::{NullSink, Recompiler};
use fardel_pipeline::WorkerPool;
use fardel_resolve::Resolver;

use crate::pipeline::{bundle_specs, resolve_project_root};
use crate::{BuildArgs, GlobalArgs};

/// Runs a full compile and writes every artifact under the output dir.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_root = resolve_project_root(global)?;
    let config = load_config(&project_root)?;

    let resolver = Resolver::new(&config.resolver);
    let specs = bundle_specs(&config, &project_root);
    let workers = args.workers.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    let mut recompiler = Recompiler::new(
        project_root.clone(),
        config.project.name.clone(),
        resolver,
        specs,
        config.output.implicit_template.clone(),
    )
    .with_worker_pool(WorkerPool::new(workers)?);

    let mut sink = NullSink;
    let result = recompiler.build(&mut sink)?;

    let out_dir = project_root.join(args.out.as_deref().unwrap_or(&config.output.dir));
    let written = write_artifacts(result, &out_dir)?;

    if !global.quiet {
        for bundle in &result.bundles {
            println!(
                "  {:<16} {:>4} modules  {}",
                bundle.name,
                bundle.module_hashes.len(),
                bundle.dest
            );
        }
        println!(
            "wrote {} artifact(s) to {}",
            written.len(),
            out_dir.display()
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn build_writes_artifacts_to_the_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("fardel.toml"),
            r#"
[project]
name = "demo"
version = "0.1.0"

[bundles.app]
entry = "./src/main.js"
dest = "app.[hash].js"
"#,
        );
        write(&root.join("src/main.js"), "require('./lib');");
        write(&root.join("src/lib.js"), "module.exports = 1;");

        let global = GlobalArgs {
            quiet: true,
            config: Some(root.to_string_lossy().into_owned()),
        };
        let args = BuildArgs { out: None, workers: None };
        let code = run(&args, &global).unwrap();
        assert_eq!(code, 0);

        let dist = root.join("dist");
        let entries: Vec<_> = fs::read_dir(&dist).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].as_ref().unwrap().file_name();
        assert!(name.to_string_lossy().starts_with("app."));
    }

    #[test]
    fn broken_import_surfaces_as_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("fardel.toml"),
            r#"
[project]
name = "demo"
version = "0.1.0"

[bundles.app]
entry = "./main.js"
dest = "app.js"
"#,
        );
        write(&root.join("main.js"), "require('./missing');");

        let global = GlobalArgs {
            quiet: true,
            config: Some(root.to_string_lossy().into_owned()),
        };
        let args = BuildArgs { out: None, workers: None };
        let err = run(&args, &global).unwrap_err();
        // A resolution failure, not a config one: the message names the import.
        assert!(err.to_string().contains("./missing"));
    }
}
