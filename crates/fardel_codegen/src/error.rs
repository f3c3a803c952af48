//! Error types for the built-in source scanner.

/// Errors produced while scanning source text for import calls.
///
/// Parse errors are fatal to the containing build: they identify the file
/// (by its source label) and the underlying syntax problem.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A string literal was opened but never closed.
    #[error("parse error in {label}: unterminated string literal at byte {offset}")]
    UnterminatedString {
        /// Source label of the offending file.
        label: String,
        /// Byte offset of the opening quote.
        offset: usize,
    },

    /// A block comment was opened but never closed.
    #[error("parse error in {label}: unterminated block comment at byte {offset}")]
    UnterminatedComment {
        /// Source label of the offending file.
        label: String,
        /// Byte offset of the comment opener.
        offset: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unterminated_string_display() {
        let err = ParseError::UnterminatedString {
            label: "app:main.js".to_string(),
            offset: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("app:main.js"));
        assert!(msg.contains("unterminated string literal"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn unterminated_comment_display() {
        let err = ParseError::UnterminatedComment {
            label: "app:main.js".to_string(),
            offset: 3,
        };
        assert!(err.to_string().contains("unterminated block comment"));
    }
}
