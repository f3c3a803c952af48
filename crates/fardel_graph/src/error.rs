//! Error types for module graph building.

use std::path::PathBuf;

use fardel_codegen::ParseError;
use fardel_resolve::ResolveError;

/// Errors that abort a module graph build.
///
/// All of them are fatal to the whole compilation attempt: no partial bundle
/// output is ever produced from a graph that failed to build.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A source file could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An import inside a module could not be resolved.
    #[error("in {importer}: {source}")]
    UnresolvedImport {
        /// URI of the importing module.
        importer: String,
        /// The import string that failed to resolve.
        request: String,
        /// The resolver's error.
        source: ResolveError,
    },

    /// A bundle seed reference could not be resolved.
    #[error("cannot resolve bundle root: {source}")]
    UnresolvedSeed {
        /// The seed request string.
        request: String,
        /// The resolver's error.
        source: ResolveError,
    },

    /// A require-like call with no target argument was discovered.
    #[error("in {importer}: import call with no target argument")]
    EmptyImport {
        /// URI of the offending module.
        importer: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_import_names_module_and_request() {
        let err = GraphError::UnresolvedImport {
            importer: "app:src/main.js".to_string(),
            request: "./missing".to_string(),
            source: ResolveError::NotFound {
                request: "./missing".to_string(),
                context_dir: PathBuf::from("/p/src"),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("app:src/main.js"));
        assert!(msg.contains("./missing"));
    }

    #[test]
    fn empty_import_display() {
        let err = GraphError::EmptyImport {
            importer: "app:a.js".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "in app:a.js: import call with no target argument"
        );
    }

    #[test]
    fn io_error_names_path() {
        let err = GraphError::Io {
            path: PathBuf::from("/p/gone.js"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/p/gone.js"));
    }
}
