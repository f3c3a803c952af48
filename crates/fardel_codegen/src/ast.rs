//! The opaque module AST: raw text interleaved with rewritable import slots.

/// One piece of a parsed module body.
///
/// A module body is a sequence of raw text runs and import slots. An import
/// slot holds the string argument of one synchronous import call; the
/// surrounding call syntax (including both quote characters) lives in the
/// adjacent text runs, so rewriting an import only ever touches the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A raw run of source text, emitted verbatim.
    Text(String),
    /// The string argument of an import call, rewritable in place.
    Import(String),
}

/// A parsed module body.
///
/// Opaque to the compilation engine: the only structure exposed is the list
/// of import-call string arguments, which the module graph builder rewrites
/// to content hashes before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ast {
    label: String,
    segments: Vec<Segment>,
    empty_import_offsets: Vec<usize>,
}

/// Rendered output of an [`Ast`]: code plus an optional source map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The rendered module code.
    pub code: String,
    /// An optional source map. The built-in scanner does not produce one.
    pub source_map: Option<String>,
}

impl Ast {
    /// Creates an AST from its parts. Used by the scanner and by tests.
    pub fn new(label: String, segments: Vec<Segment>, empty_import_offsets: Vec<usize>) -> Self {
        Self {
            label,
            segments,
            empty_import_offsets,
        }
    }

    /// The source label this AST was parsed from.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the import-call string arguments in source order.
    ///
    /// Duplicates are preserved; deduplication is the graph builder's job.
    pub fn import_args(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Import(arg) => Some(arg.as_str()),
                Segment::Text(_) => None,
            })
            .collect()
    }

    /// Byte offsets of import calls that carry no target argument.
    ///
    /// These are fatal at dependency-discovery time; the scanner only
    /// records them so the builder can report the offending call.
    pub fn empty_import_offsets(&self) -> &[usize] {
        &self.empty_import_offsets
    }

    /// Rewrites import arguments in place.
    ///
    /// The callback receives each current argument and returns the
    /// replacement, or `None` to leave the slot untouched.
    pub fn rewrite_imports<F>(&mut self, mut rewrite: F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        for segment in &mut self.segments {
            if let Segment::Import(arg) = segment {
                if let Some(replacement) = rewrite(arg) {
                    *arg = replacement;
                }
            }
        }
    }

    /// Renders the AST back to code.
    pub fn render(&self) -> Rendered {
        let mut code = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => code.push_str(text),
                Segment::Import(arg) => code.push_str(arg),
            }
        }
        Rendered {
            code,
            source_map: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ast {
        Ast::new(
            "app:main.js".to_string(),
            vec![
                Segment::Text("var a = require(\"".to_string()),
                Segment::Import("./a".to_string()),
                Segment::Text("\");\n".to_string()),
            ],
            Vec::new(),
        )
    }

    #[test]
    fn import_args_in_order() {
        assert_eq!(sample().import_args(), vec!["./a"]);
    }

    #[test]
    fn render_roundtrips_text() {
        let rendered = sample().render();
        assert_eq!(rendered.code, "var a = require(\"./a\");\n");
        assert!(rendered.source_map.is_none());
    }

    #[test]
    fn rewrite_replaces_only_matched_slots() {
        let mut ast = sample();
        ast.rewrite_imports(|arg| (arg == "./a").then(|| "cafebabe".to_string()));
        assert_eq!(ast.render().code, "var a = require(\"cafebabe\");\n");
    }

    #[test]
    fn rewrite_none_leaves_slot() {
        let mut ast = sample();
        ast.rewrite_imports(|_| None);
        assert_eq!(ast.import_args(), vec!["./a"]);
    }
}
