//! Project configuration for the Fardel bundler.
//!
//! Parses and validates `fardel.toml`: project metadata, resolver settings,
//! output settings, and the declared bundle roots (entry and split points).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{BundleDecl, OutputConfig, ProjectConfig, ProjectMeta, ResolverConfig};
