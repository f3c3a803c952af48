//! Named, extensible bundling operations.

use std::path::PathBuf;

use fardel_pipeline::Chain;

use crate::bundle::Bundle;
use crate::error::BundleError;
use crate::render::CompilationResult;
use crate::spec::BundleSpec;

/// Arguments to the `partition` operation.
#[derive(Debug, Clone)]
pub struct PartitionRequest {
    /// The declared bundle specs.
    pub specs: Vec<BundleSpec>,
    /// Resolved root path per spec, in spec order.
    pub roots: Vec<PathBuf>,
    /// Destination template for implicit bundles.
    pub implicit_template: String,
}

/// Arguments to the `render` operation.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// The partitioned bundles to render.
    pub bundles: Vec<Bundle>,
}

/// The bundling phase's operation registry.
///
/// Same contract as the graph-building registry: plugins append overrides
/// and transforms before the compilation starts, the driver supplies the
/// default implementations at invocation time.
#[derive(Debug)]
pub struct BundleOps {
    /// Module-set partitioning (phases A through D).
    pub partition: Chain<PartitionRequest, Vec<Bundle>, BundleError>,
    /// Artifact rendering, bundle sets to final code.
    pub render: Chain<RenderRequest, CompilationResult, BundleError>,
}

impl BundleOps {
    /// Creates a registry with no extensions.
    pub fn new() -> Self {
        Self {
            partition: Chain::new("partition"),
            render: Chain::new("render"),
        }
    }

    /// Lets a plugin register its overrides and transforms.
    pub fn install<F>(&mut self, plugin: F)
    where
        F: FnOnce(&mut BundleOps),
    {
        plugin(self);
    }
}

impl Default for BundleOps {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fardel_pipeline::{OpContext, OverrideOutcome};

    #[test]
    fn starts_unextended() {
        let ops = BundleOps::new();
        assert!(!ops.partition.is_extended());
        assert!(!ops.render.is_extended());
        assert_eq!(ops.partition.name(), "partition");
        assert_eq!(ops.render.name(), "render");
    }

    #[test]
    fn partition_override_replaces_the_default() {
        let mut ops = BundleOps::new();
        ops.install(|ops| {
            ops.partition
                .override_with(|_, _| Ok(OverrideOutcome::Handled(Vec::new())));
        });
        let request = PartitionRequest {
            specs: Vec::new(),
            roots: Vec::new(),
            implicit_template: "chunk.[setHash].js".to_string(),
        };
        let bundles = ops
            .partition
            .invoke(&request, &OpContext::new(), |_, _| {
                panic!("default must not run")
            })
            .unwrap();
        assert!(bundles.is_empty());
    }

    #[test]
    fn render_transform_post_processes_artifacts() {
        let mut ops = BundleOps::new();
        ops.render.transform_with(|mut result, _, _| {
            for artifact in result.artifacts.values_mut() {
                artifact.code.insert_str(0, "/* banner */\n");
            }
            result
        });
        let request = RenderRequest { bundles: Vec::new() };
        let result = ops
            .render
            .invoke(&request, &OpContext::new(), |_, _| {
                let mut artifacts = std::collections::BTreeMap::new();
                artifacts.insert(
                    "a.js".to_string(),
                    crate::render::Artifact {
                        code: "x".to_string(),
                        source_map: None,
                    },
                );
                Ok(CompilationResult {
                    artifacts,
                    bundles: Vec::new(),
                })
            })
            .unwrap();
        assert!(result.artifacts["a.js"].code.starts_with("/* banner */"));
    }
}
