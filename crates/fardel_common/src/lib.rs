//! Shared foundational types used across the Fardel bundler.
//!
//! This crate provides content hashing, the identity scheme for modules and
//! bundles: everything downstream of discovery addresses modules by their
//! [`ContentHash`].

#![warn(missing_docs)]

pub mod hash;

pub use hash::{ContentHash, ContentHasher};
