//! Bundling errors.

use std::path::PathBuf;

use fardel_common::ContentHash;
use thiserror::Error;

/// Errors raised while partitioning, rendering, or writing bundles.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A declared seed resolved to a path the graph does not contain.
    #[error("seed module {path:?} is not in the module graph")]
    MissingSeed {
        /// Resolved absolute path of the missing seed.
        path: PathBuf,
    },

    /// A partitioned hash has no module behind it in the graph.
    #[error("module {hash} is not in the module graph")]
    MissingModule {
        /// The dangling content hash.
        hash: ContentHash,
    },

    /// `[primaryModuleHash]` used in the template of a rootless bundle.
    #[error("destination template {template:?} uses [primaryModuleHash] but the bundle has no root module")]
    RootlessTemplate {
        /// The offending template.
        template: String,
    },

    /// Writing an artifact to disk failed.
    #[error("failed to write artifact {path:?}")]
    Write {
        /// Destination path of the artifact.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
