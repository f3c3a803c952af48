//! Content hashing for module identity, bundle identity, and cache invalidation.

use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::Xxh3;

/// A 128-bit content hash computed using XXH3.
///
/// Two inputs with the same `ContentHash` are assumed to have identical
/// content. Modules and bundles are addressed by their content hash
/// throughout the compiler: it serves as both a unique identity and a
/// cache-invalidation key. Hashes order lexicographically over their raw
/// bytes, which is what the sorted-dependency-hash rule relies on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash of a single byte slice.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Returns the hash as a lowercase hex string (32 characters).
    pub fn to_hex(&self) -> String {
        format!("{self}")
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

/// A streaming XXH3-128 hasher for multi-part digests.
///
/// Module and bundle hashes are built from several inputs (source text,
/// namespace metadata, dependency hashes, flags). All of them go through
/// this type so the digest framing is uniform: string inputs are
/// length-prefixed to prevent adjacent fields from bleeding into each other.
pub struct ContentHasher {
    inner: Xxh3,
}

impl ContentHasher {
    /// Creates a fresh hasher with an empty state.
    pub fn new() -> Self {
        Self { inner: Xxh3::new() }
    }

    /// Feeds raw bytes into the digest.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Feeds a string into the digest, framed by its byte length.
    pub fn update_str(&mut self, s: &str) {
        self.inner.update(s.len().to_string().as_bytes());
        self.inner.update(b":");
        self.inner.update(s.as_bytes());
        self.inner.update(&[0]);
    }

    /// Feeds another content hash's raw bytes into the digest.
    pub fn update_hash(&mut self, hash: &ContentHash) {
        self.inner.update(hash.as_bytes());
    }

    /// Feeds a boolean flag into the digest.
    pub fn update_bool(&mut self, value: bool) {
        self.inner.update(if value { b"1" } else { b"0" });
        self.inner.update(&[0]);
    }

    /// Finalizes the digest and returns the resulting hash.
    pub fn finish(self) -> ContentHash {
        ContentHash(self.inner.digest128().to_le_bytes())
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}
