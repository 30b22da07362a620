//! # Account Addresses
//!
//! An address is the human-facing name of an account. It is derived from
//! the account's Ed25519 public key:
//!
//! ```text
//! public_key (32 bytes)
//!     -> BLAKE3(public_key)[..20]                  = key_hash
//!     -> version (1) || key_hash (20)              = body
//!     -> body || double_sha256(body)[..4]          = raw (25 bytes)
//!     -> Base58(raw)                               = "Q..."
//! ```
//!
//! The checksum catches typos; the version byte makes every address start
//! with the same letter so they are recognisable at a glance. The ledger
//! snapshot keys accounts by address, not by public key, so an account can
//! hold a balance before it has ever signed anything.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{ADDRESS_CHECKSUM_LENGTH, ADDRESS_HASH_LENGTH, ADDRESS_LENGTH, ADDRESS_VERSION};
use crate::crypto::hash::{blake3_hash, double_sha256};
use crate::crypto::keys::QuillPublicKey;

/// Errors that can occur while parsing an address string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The string is not valid Base58.
    #[error("base58 decode error: {0}")]
    Base58Decode(String),

    /// The decoded address has the wrong length.
    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },

    /// The leading version byte is not the one this network uses.
    #[error("invalid address version: expected {expected}, got {got}")]
    InvalidVersion {
        /// The version byte we accept.
        expected: u8,
        /// The version byte that was found.
        got: u8,
    },

    /// The trailing checksum does not match the address body.
    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// A checksummed account address.
///
/// Equality, ordering, and hashing are over the raw 25 bytes, so two
/// `Address` values compare equal exactly when their Base58 strings do.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    raw: [u8; ADDRESS_LENGTH],
}

impl Address {
    /// Derive the address of a public key.
    pub fn from_public_key(public_key: &QuillPublicKey) -> Self {
        let key_hash = blake3_hash(public_key.as_bytes());

        let mut raw = [0u8; ADDRESS_LENGTH];
        raw[0] = ADDRESS_VERSION;
        raw[1..=ADDRESS_HASH_LENGTH].copy_from_slice(&key_hash[..ADDRESS_HASH_LENGTH]);

        let body_len = 1 + ADDRESS_HASH_LENGTH;
        let checksum = double_sha256(&raw[..body_len]);
        raw[body_len..].copy_from_slice(&checksum[..ADDRESS_CHECKSUM_LENGTH]);

        Self { raw }
    }

    /// Parse and validate a Base58 address string.
    ///
    /// Checks length, version byte, and checksum. Only the key hash is
    /// recoverable from an address; the public key is not.
    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| AddressError::Base58Decode(e.to_string()))?;

        let raw: [u8; ADDRESS_LENGTH] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| AddressError::InvalidLength {
                    expected: ADDRESS_LENGTH,
                    got: bytes.len(),
                })?;

        if raw[0] != ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion {
                expected: ADDRESS_VERSION,
                got: raw[0],
            });
        }

        let body_len = 1 + ADDRESS_HASH_LENGTH;
        let checksum = double_sha256(&raw[..body_len]);
        if raw[body_len..] != checksum[..ADDRESS_CHECKSUM_LENGTH] {
            return Err(AddressError::ChecksumMismatch);
        }

        Ok(Self { raw })
    }

    /// Base58 string form, e.g. `Qf3...`.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.raw).into_string()
    }

    /// Raw 25-byte form: version, key hash, checksum.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.raw
    }

    /// Returns `true` if this address was derived from `public_key`.
    pub fn belongs_to(&self, public_key: &QuillPublicKey) -> bool {
        *self == Self::from_public_key(public_key)
    }
}

impl From<&QuillPublicKey> for Address {
    fn from(public_key: &QuillPublicKey) -> Self {
        Self::from_public_key(public_key)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}
