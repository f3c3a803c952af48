//! Parser/codegen adapter boundary for the Fardel bundler.
//!
//! The compilation engine treats module bodies as an opaque [`Ast`]: all it
//! needs is to parse source text, enumerate the string arguments of
//! synchronous import calls, rewrite those arguments in place, and render the
//! result back to code. This crate ships a built-in scanner sufficient for
//! JavaScript-style `require("x")`, `import "x"`, and `from "x"` forms;
//! richer languages plug in through the pipeline's discover operation.

#![warn(missing_docs)]

pub mod ast;
pub mod error;
pub mod scan;

pub use ast::{Ast, Rendered, Segment};
pub use error::ParseError;
pub use scan::parse;
