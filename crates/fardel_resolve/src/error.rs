//! Error types for module resolution.

use std::path::PathBuf;

/// Errors that can occur while resolving a module reference.
///
/// Resolution failure is a structured error, not a panic; the caller
/// surfaces it as a build error naming the importing module.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The reference could not be mapped to any file.
    #[error("cannot resolve '{request}' from {}", context_dir.display())]
    NotFound {
        /// The original request string.
        request: String,
        /// The context directory the request was made from.
        context_dir: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = ResolveError::NotFound {
            request: "./missing".to_string(),
            context_dir: PathBuf::from("/proj/src"),
        };
        let msg = err.to_string();
        assert!(msg.contains("./missing"));
        assert!(msg.contains("/proj/src"));
    }
}
