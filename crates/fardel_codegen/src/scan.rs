//! Built-in import scanner for JavaScript-style module sources.
//!
//! Walks the source text once, skipping comments and string literals, and
//! carves the body into [`Segment`]s wherever a synchronous import call's
//! string argument appears: `require("x")`, `import "x"`, and the `from "x"`
//! clause of declaration imports. Import calls with no target argument are
//! recorded by offset so the graph builder can reject them at discovery time.

use crate::ast::{Ast, Segment};
use crate::error::ParseError;

/// Parses source text into an [`Ast`] with rewritable import slots.
///
/// `label` identifies the file in error messages (typically the module's
/// canonical URI).
pub fn parse(source: &str, label: &str) -> Result<Ast, ParseError> {
    let mut scanner = Scanner {
        source: source.as_bytes(),
        text: source,
        label,
        pos: 0,
        text_start: 0,
        segments: Vec::new(),
        empty_imports: Vec::new(),
    };
    scanner.scan_all()
}

struct Scanner<'a> {
    source: &'a [u8],
    text: &'a str,
    label: &'a str,
    pos: usize,
    text_start: usize,
    segments: Vec<Segment>,
    empty_imports: Vec<usize>,
}

impl Scanner<'_> {
    fn scan_all(mut self) -> Result<Ast, ParseError> {
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'/' if self.peek_at(self.pos + 1) == b'/' => self.skip_line_comment(),
                b'/' if self.peek_at(self.pos + 1) == b'*' => self.skip_block_comment()?,
                b'\'' | b'"' | b'`' => self.skip_string()?,
                c if is_ident_start(c) => self.scan_ident()?,
                _ => self.pos += 1,
            }
        }
        if self.text_start < self.text.len() {
            self.segments
                .push(Segment::Text(self.text[self.text_start..].to_string()));
        }
        Ok(Ast::new(
            self.label.to_string(),
            self.segments,
            self.empty_imports,
        ))
    }

    fn peek_at(&self, pos: usize) -> u8 {
        if pos < self.source.len() {
            self.source[pos]
        } else {
            0
        }
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        self.pos += 2;
        while self.pos < self.source.len() {
            if self.source[self.pos] == b'*' && self.peek_at(self.pos + 1) == b'/' {
                self.pos += 2;
                return Ok(());
            }
            self.pos += 1;
        }
        Err(ParseError::UnterminatedComment {
            label: self.label.to_string(),
            offset: start,
        })
    }

    /// Skips over a string literal that is not an import argument.
    fn skip_string(&mut self) -> Result<(), ParseError> {
        let quote = self.source[self.pos];
        let start = self.pos;
        self.pos += 1;
        while self.pos < self.source.len() {
            match self.source[self.pos] {
                b'\\' => self.pos += 2,
                c if c == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => self.pos += 1,
            }
        }
        Err(ParseError::UnterminatedString {
            label: self.label.to_string(),
            offset: start,
        })
    }

    fn scan_ident(&mut self) -> Result<(), ParseError> {
        let start = self.pos;
        while self.pos < self.source.len() && is_ident_continue(self.source[self.pos]) {
            self.pos += 1;
        }
        match &self.text[start..self.pos] {
            "require" => self.scan_require_call(start),
            "import" | "from" => self.scan_import_clause(),
            _ => Ok(()),
        }
    }

    /// Handles `require(<string>)` and the no-argument `require()` form.
    fn scan_require_call(&mut self, keyword_start: usize) -> Result<(), ParseError> {
        let mut p = self.skip_ws(self.pos);
        if self.peek_at(p) != b'(' {
            return Ok(());
        }
        p = self.skip_ws(p + 1);
        match self.peek_at(p) {
            b'\'' | b'"' => {
                self.capture_import(p)?;
                Ok(())
            }
            b')' => {
                self.empty_imports.push(keyword_start);
                self.pos = p + 1;
                Ok(())
            }
            // Dynamic argument: not a statically analyzable import.
            _ => Ok(()),
        }
    }

    /// Handles `import "<string>"` and `from "<string>"`.
    fn scan_import_clause(&mut self) -> Result<(), ParseError> {
        let p = self.skip_ws(self.pos);
        match self.peek_at(p) {
            b'\'' | b'"' => {
                self.capture_import(p)?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Captures the string literal starting at `quote_pos` as an import slot.
    ///
    /// The opening quote stays with the preceding text run and the closing
    /// quote starts the following one, so only the argument itself is
    /// rewritable.
    fn capture_import(&mut self, quote_pos: usize) -> Result<(), ParseError> {
        let quote = self.source[quote_pos];
        let mut p = quote_pos + 1;
        while p < self.source.len() {
            match self.source[p] {
                b'\\' => p += 2,
                c if c == quote => {
                    self.segments.push(Segment::Text(
                        self.text[self.text_start..quote_pos + 1].to_string(),
                    ));
                    self.segments
                        .push(Segment::Import(self.text[quote_pos + 1..p].to_string()));
                    self.text_start = p;
                    self.pos = p + 1;
                    return Ok(());
                }
                _ => p += 1,
            }
        }
        Err(ParseError::UnterminatedString {
            label: self.label.to_string(),
            offset: quote_pos,
        })
    }

    fn skip_ws(&self, mut p: usize) -> usize {
        while p < self.source.len() && self.source[p].is_ascii_whitespace() {
            p += 1;
        }
        p
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}
