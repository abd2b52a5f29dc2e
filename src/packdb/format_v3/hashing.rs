//! Content digests for blob addressing
//!
//! Every stored blob is addressed by the lowercase hex SHA-256 of its
//! bytes; the digest doubles as the blob's archive path under `Assets/`.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io::Read;

use crate::exceptions::{GarbError, Result};

/// A SHA-256 content digest identifying one stored blob.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Compute the digest of a byte slice
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Compute the digest of a reader using streaming I/O
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        const BUFFER_SIZE: usize = 8 * 1024 * 1024; // 8MB buffer
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Self(hasher.finalize().into()))
    }

    /// The digest as 64 lowercase hex characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a digest from its 64-character lowercase hex form
    pub fn parse_hex(s: &str) -> Result<Self> {
        if s.len() != 64 || s.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(GarbError::Generic(format!(
                "Invalid content digest '{s}': expected 64 lowercase hex characters"
            )));
        }
        let decoded = hex::decode(s)
            .map_err(|e| GarbError::Generic(format!("Invalid content digest '{s}': {e}")))?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Check whether this digest matches the given bytes
    pub fn matches(&self, data: &[u8]) -> bool {
        Self::from_bytes(data) == *self
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
