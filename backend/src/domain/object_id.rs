//! Twelve-byte document identifiers rendered as 24 lowercase hex characters.
//!
//! Layout follows the familiar document-store scheme: a big-endian seconds
//! timestamp, five bytes of per-process randomness, then a three-byte counter.
//! Generated identifiers therefore sort roughly by creation time, which the
//! persistence adapter relies on for insertion-ordered listing.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, RngCore};
use thiserror::Error;

const LEN: usize = 12;
const COUNTER_MASK: u32 = 0x00ff_ffff;

/// Failure to interpret text or bytes as an [`ObjectId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectIdError {
    #[error("identifier must be {expected} characters long, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("identifier must be hexadecimal")]
    InvalidHex,
    #[error("stored identifier must be 12 bytes, got {actual}")]
    InvalidBytes { actual: usize },
}

/// Document identifier.
///
/// # Examples
/// ```
/// use course_lists::domain::ObjectId;
///
/// let id: ObjectId = "5f1b7c3e9d1a2b3c4d5e6f70".parse().expect("valid id");
/// assert_eq!(id.to_string(), "5f1b7c3e9d1a2b3c4d5e6f70");
/// assert!(ObjectId::parse_or_nil("nope").is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; LEN]);

impl ObjectId {
    /// The all-zero identifier.
    pub const NIL: Self = Self([0; LEN]);

    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        let timestamp = u32::try_from(seconds).unwrap_or(u32::MAX);
        let count = counter().fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0_u8; LEN];
        bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique());
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        Self(bytes)
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; LEN]) -> Self {
        Self(bytes)
    }

    /// Rebuild an identifier from a stored byte string.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ObjectIdError> {
        <[u8; LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| ObjectIdError::InvalidBytes {
                actual: bytes.len(),
            })
    }

    /// Lenient parse: malformed input yields [`ObjectId::NIL`].
    #[must_use]
    pub fn parse_or_nil(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::NIL)
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8; LEN] {
        &self.0
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        *self == Self::NIL
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != LEN * 2 {
            return Err(ObjectIdError::InvalidLength {
                expected: LEN * 2,
                actual: s.len(),
            });
        }
        let mut bytes = [0_u8; LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ObjectIdError::InvalidHex)?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn process_unique() -> &'static [u8; 5] {
    static VALUE: OnceLock<[u8; 5]> = OnceLock::new();
    VALUE.get_or_init(|| {
        let mut bytes = [0_u8; 5];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    })
}

fn counter() -> &'static AtomicU32 {
    static VALUE: OnceLock<AtomicU32> = OnceLock::new();
    VALUE.get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..=COUNTER_MASK)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[rstest]
    #[case("terekjkdfjdfhd")]
    #[case("")]
    #[case("zzzzzzzzzzzzzzzzzzzzzzzz")]
    #[case("5f1b7c3e9d1a2b3c4d5e6f7")]
    fn strict_parse_rejects_malformed_text(#[case] raw: &str) {
        assert!(raw.parse::<ObjectId>().is_err());
    }

    #[rstest]
    #[case("not-a-valid-id")]
    #[case("5f1b7c3e9d1a2b3c4d5e6f7g")]
    fn lenient_parse_collapses_to_nil(#[case] raw: &str) {
        assert_eq!(ObjectId::parse_or_nil(raw), ObjectId::NIL);
    }

    #[test]
    fn uppercase_hex_renders_lowercase() {
        let id: ObjectId = "5F1B7C3E9D1A2B3C4D5E6F70".parse().expect("valid id");
        assert_eq!(id.to_string(), "5f1b7c3e9d1a2b3c4d5e6f70");
    }

    #[test]
    fn generated_ids_are_distinct_and_not_nil() {
        let ids: HashSet<ObjectId> = (0..256).map(|_| ObjectId::generate()).collect();
        assert_eq!(ids.len(), 256);
        assert!(!ids.contains(&ObjectId::NIL));
    }

    #[test]
    fn from_slice_requires_twelve_bytes() {
        assert_eq!(
            ObjectId::from_slice(&[1, 2, 3]),
            Err(ObjectIdError::InvalidBytes { actual: 3 })
        );
        let id = ObjectId::generate();
        assert_eq!(ObjectId::from_slice(id.bytes()), Ok(id));
    }
}
