//! # Commitment Types
//!
//! The identifier that keys the ledger's commitment store, the issuing
//! authority newtype, and the ledger-resident record itself.
//!
//! ## Lifecycle
//!
//! ```text
//! absent ──submit──▶ pending (in-flight tx) ──finality──▶ published
//! ```
//!
//! A published commitment is write-once. There is no "expired" ledger
//! state: expiry is computed at the point of use with
//! [`Commitment::is_expired_at`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Length of a commitment identifier in bytes.
pub const COMMITMENT_ID_LEN: usize = 32;

/// A 32-byte commitment identifier (SHA-256 of the canonical proof input).
///
/// Serializes as a `0x`-prefixed lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommitmentId([u8; COMMITMENT_ID_LEN]);

impl CommitmentId {
    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; COMMITMENT_ID_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a hex identifier, with or without a `0x` prefix.
    ///
    /// Exactly 64 hex digits are required.
    pub fn from_hex(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.len() != COMMITMENT_ID_LEN * 2 {
            return Err(ValidationError::MalformedIdentifier(format!(
                "expected {} hex digits, got {}",
                COMMITMENT_ID_LEN * 2,
                digits.len()
            )));
        }

        let mut bytes = [0u8; COMMITMENT_ID_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| ValidationError::MalformedIdentifier(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; COMMITMENT_ID_LEN] {
        &self.0
    }

    /// Lowercase hex without prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Lowercase hex with a `0x` prefix, the form used on the wire.
    pub fn to_prefixed_hex(&self) -> String {
        format!("0x{}", self.to_hex())
    }
}

impl std::fmt::Display for CommitmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_prefixed_hex())
    }
}

impl std::str::FromStr for CommitmentId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for CommitmentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_prefixed_hex())
    }
}

impl<'de> Deserialize<'de> for CommitmentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifier of an issuing authority. Always positive.
///
/// Legitimacy of the authority is not checked here; the ledger contract
/// decides whether the signer may issue under this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct IssuerId(u64);

impl IssuerId {
    /// Issuer id used when none is configured.
    pub const DEFAULT: Self = Self(1);

    /// Validate and wrap an issuer id.
    pub fn new(id: u64) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::InvalidIssuerId(id));
        }
        Ok(Self(id))
    }

    /// The numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for IssuerId {
    type Error = ValidationError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<IssuerId> for u64 {
    fn from(id: IssuerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for IssuerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published commitment as read back from the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment {
    /// Primary key on the ledger.
    pub id: CommitmentId,
    /// Issuing authority.
    pub issuer_id: u64,
    /// Expiry, Unix seconds.
    pub validity_window: u64,
}

impl Commitment {
    /// Whether the commitment has expired at `now` (Unix seconds).
    ///
    /// The window is exclusive: a commitment is valid strictly before
    /// `validity_window`.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now >= self.validity_window
    }
}
