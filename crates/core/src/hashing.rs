//! SHA-256 content hashing for uploaded images.
//!
//! The digest over the raw upload bytes is the dedup key for catalog
//! entries. No normalization is applied, so two different encodings of
//! the same visual image hash differently.

use sha2::{Digest, Sha256};

/// Chunk size used when feeding a staged upload file through the hasher.
pub const HASH_CHUNK_SIZE: usize = 4096;

/// Incremental SHA-256 digest over a byte stream.
///
/// The final digest depends only on the concatenated bytes, not on how
/// the stream was chunked.
#[derive(Default)]
pub struct ContentHasher {
    inner: Sha256,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb the next chunk of the stream.
    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
    }

    /// Consume the hasher and return the lowercase hex digest.
    pub fn finish(self) -> String {
        let hash = self.inner.finalize();
        format!("{hash:x}")
    }
}

/// Compute a SHA-256 hex digest of the given bytes in one shot.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}
