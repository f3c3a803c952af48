//! Module reference resolution for the Fardel bundler.
//!
//! Maps an import reference (a relative path or a bare package name) plus the
//! context directory it was requested from to an absolute file identity and
//! namespace metadata. Resolution only reads filesystem metadata; it never
//! mutates anything.

#![warn(missing_docs)]

pub mod asset;
pub mod error;
pub mod resolver;

pub use asset::{ModuleReference, ResolvedAsset};
pub use error::ResolveError;
pub use resolver::Resolver;
