//! Sortable unique resource identifiers
//!
//! Every export gets a 26-character identifier derived from 10 bytes of
//! entropy followed by 6 bytes of big-endian millisecond timestamp, encoded
//! with the lowercase Crockford base32 alphabet. Two identifiers generated
//! in the same millisecond still differ with overwhelming probability.

use log::warn;
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::exceptions::{GarbError, Result};

/// Alphabet used for identifier encoding (Crockford, rendered lowercase).
const BASE32: base32::Alphabet = base32::Alphabet::Crockford;

/// Length of an encoded identifier in characters.
pub const ENCODED_LEN: usize = 26;

const RANDOM_LEN: usize = 10;
const TIMESTAMP_LEN: usize = 6;
const PAYLOAD_LEN: usize = RANDOM_LEN + TIMESTAMP_LEN;

/// Millisecond timestamps are truncated to 48 bits before packing.
const TIMESTAMP_MASK: u64 = 0xFFFF_FFFF_FFFF;

/// Source of "now" in milliseconds since the Unix epoch.
///
/// Injected so identifier generation is deterministic under test.
pub trait Clock {
    /// Current time in milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Wall-clock time via chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// A generated resource identifier: 10 entropy bytes then 6 timestamp bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId([u8; PAYLOAD_LEN]);

impl ResourceId {
    /// Generate an identifier from explicit entropy and clock sources.
    pub fn generate_with<R: RngCore>(rng: &mut R, clock: &impl Clock) -> Self {
        let mut entropy = [0u8; RANDOM_LEN];
        rng.fill_bytes(&mut entropy);
        Self::from_parts(entropy, clock.now_millis())
    }

    /// Generate an identifier from OS entropy and the system clock.
    ///
    /// If the OS entropy source fails, generation degrades to a
    /// time-seeded PRNG rather than aborting the export.
    pub fn generate() -> Self {
        let clock = SystemClock;
        let mut entropy = [0u8; RANDOM_LEN];
        if let Err(e) = OsRng.try_fill_bytes(&mut entropy) {
            warn!("🎰 OS entropy source unavailable ({e}), using time-seeded fallback");
            let mut fallback = StdRng::seed_from_u64(clock.now_millis());
            fallback.fill_bytes(&mut entropy);
        }
        Self::from_parts(entropy, clock.now_millis())
    }

    fn from_parts(entropy: [u8; RANDOM_LEN], millis: u64) -> Self {
        let stamp = (millis & TIMESTAMP_MASK).to_be_bytes();
        let mut payload = [0u8; PAYLOAD_LEN];
        payload[..RANDOM_LEN].copy_from_slice(&entropy);
        payload[RANDOM_LEN..].copy_from_slice(&stamp[8 - TIMESTAMP_LEN..]);
        ResourceId(payload)
    }

    /// Parse a previously encoded identifier.
    pub fn parse(encoded: &str) -> Result<Self> {
        if encoded.len() != ENCODED_LEN {
            return Err(GarbError::Generic(format!(
                "Invalid resource id '{encoded}': expected {ENCODED_LEN} characters, got {}",
                encoded.len()
            )));
        }

        let decoded = base32::decode(BASE32, encoded)
            .ok_or_else(|| GarbError::Generic(format!("Invalid resource id '{encoded}'")))?;
        if decoded.len() < PAYLOAD_LEN {
            return Err(GarbError::Generic(format!(
                "Invalid resource id '{encoded}'"
            )));
        }
        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(&decoded[..PAYLOAD_LEN]);
        let id = ResourceId(payload);

        // Reject aliased spellings (mixed case, O-for-0) and non-zero
        // trailing bits so every payload has exactly one encoding.
        if id.to_string() != encoded {
            return Err(GarbError::Generic(format!(
                "Non-canonical resource id '{encoded}'"
            )));
        }
        Ok(id)
    }

    /// The raw 16-byte payload.
    pub fn as_bytes(&self) -> &[u8; PAYLOAD_LEN] {
        &self.0
    }

    /// Millisecond timestamp packed into the identifier (48-bit).
    pub fn timestamp_millis(&self) -> u64 {
        let mut stamp = [0u8; 8];
        stamp[8 - TIMESTAMP_LEN..].copy_from_slice(&self.0[RANDOM_LEN..]);
        u64::from_be_bytes(stamp)
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&base32::encode(BASE32, &self.0).to_lowercase())
    }
}

impl std::str::FromStr for ResourceId {
    type Err = GarbError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
