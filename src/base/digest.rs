//! Content digests for snapshot invalidation.

use std::fmt;
use std::path::Path;

/// A 128-bit XXH3 fingerprint over a sequence of `(path, version)` pairs.
///
/// Two compilations with the same digest were built from identical document
/// versions and are interchangeable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(u128);

impl Digest {
    pub fn from_bytes(data: &[u8]) -> Self {
        Self(xxhash_rust::xxh3::xxh3_128(data))
    }

    pub fn as_u128(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({:08x}..)", (self.0 >> 96) as u32)
    }
}

/// Accumulates length-prefixed fields and finishes into a [`Digest`].
///
/// Fields are length-prefixed so `("ab", "c")` and `("a", "bc")` never collide.
#[derive(Debug, Default, Clone)]
pub struct DigestBuilder {
    buf: Vec<u8>,
}

impl DigestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn str(&mut self, value: &str) -> &mut Self {
        self.bytes(value.as_bytes())
    }

    pub fn path(&mut self, path: &Path) -> &mut Self {
        self.str(&path.to_string_lossy())
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn document(&mut self, path: &Path, version: u64) -> &mut Self {
        self.path(path).u64(version)
    }

    /// Folds in another digest, e.g. that of a referenced project.
    pub fn digest(&mut self, digest: Digest) -> &mut Self {
        self.buf.extend_from_slice(&digest.0.to_le_bytes());
        self
    }

    pub fn finish(&self) -> Digest {
        Digest::from_bytes(&self.buf)
    }

    fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(&(data.len() as u64).to_le_bytes());
        self.buf.extend_from_slice(data);
        self
    }
}
