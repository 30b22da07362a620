//! # Protocol Configuration & Constants
//!
//! Every magic number in Quill lives here. Field widths in this file are
//! consensus-critical: changing one changes the byte layout of every
//! transaction on the network, and with it every signature.
//!
//! The only knobs that are legitimately tunable per deployment are the
//! activation timestamps in [`ProtocolConfig`]. Devnets usually want every
//! transaction type live from time zero; mainnet follows the schedule below.

use serde::{Deserialize, Serialize};

use crate::transaction::types::TransactionType;

// ---------------------------------------------------------------------------
// Wire Format Widths
// ---------------------------------------------------------------------------

/// Width of the type discriminator at the head of every encoded transaction.
pub const TYPE_LENGTH: usize = 4;

/// Creation timestamp, milliseconds since the Unix epoch, big-endian i64.
pub const TIMESTAMP_LENGTH: usize = 8;

/// Reference to the creator's previous transaction (its signature).
pub const REFERENCE_LENGTH: usize = 64;

/// Raw Ed25519 public key of the creator.
pub const CREATOR_LENGTH: usize = 32;

/// Service tag of an arbitrary-payload transaction.
pub const SERVICE_LENGTH: usize = 4;

/// Length prefix of the arbitrary payload.
pub const DATA_SIZE_LENGTH: usize = 4;

/// Fee as a scaled two's-complement integer.
pub const FEE_LENGTH: usize = 8;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Fixed part of an arbitrary transaction after the type tag. The payload
/// length is added on top of this.
pub const ARBITRARY_BASE_LENGTH: usize = TIMESTAMP_LENGTH
    + REFERENCE_LENGTH
    + CREATOR_LENGTH
    + SERVICE_LENGTH
    + DATA_SIZE_LENGTH
    + FEE_LENGTH
    + SIGNATURE_LENGTH;

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Smallest payload an arbitrary transaction may carry.
pub const MIN_ARBITRARY_DATA_LENGTH: usize = 1;

/// Largest payload an arbitrary transaction may carry.
pub const MAX_ARBITRARY_DATA_LENGTH: usize = 4000;

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Number of fractional digits in every amount on the ledger.
pub const AMOUNT_DECIMALS: u32 = 8;

/// Raw units per whole coin (10^8).
pub const AMOUNT_SCALE: i64 = 100_000_000;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

/// Leading version byte of every address. 58 makes Base58 addresses start
/// with `Q`.
pub const ADDRESS_VERSION: u8 = 58;

/// Length of the public key hash embedded in an address.
pub const ADDRESS_HASH_LENGTH: usize = 20;

/// Length of the trailing checksum embedded in an address.
pub const ADDRESS_CHECKSUM_LENGTH: usize = 4;

/// Total decoded address length: version + hash + checksum.
pub const ADDRESS_LENGTH: usize = 1 + ADDRESS_HASH_LENGTH + ADDRESS_CHECKSUM_LENGTH;

// ---------------------------------------------------------------------------
// Activation Schedule
// ---------------------------------------------------------------------------

/// Mainnet activation of arbitrary transactions (2014-07-18T17:00:00Z).
pub const ARBITRARY_TRANSACTIONS_RELEASE: i64 = 1_405_702_800_000;

/// Per-deployment protocol settings.
///
/// Loaded from JSON by the CLI. Missing fields fall back to the mainnet
/// schedule, so an empty object `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Timestamp (ms) before which arbitrary transactions are rejected.
    pub arbitrary_release: i64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            arbitrary_release: ARBITRARY_TRANSACTIONS_RELEASE,
        }
    }
}

impl ProtocolConfig {
    /// A config with every transaction type active from the epoch.
    pub fn all_released() -> Self {
        Self {
            arbitrary_release: 0,
        }
    }

    /// Activation timestamp for the given transaction type.
    pub fn release_time(&self, tx_type: TransactionType) -> i64 {
        match tx_type {
            TransactionType::Arbitrary => self.arbitrary_release,
        }
    }

    /// Returns `true` if `tx_type` is active at `now` (ms).
    pub fn is_released(&self, tx_type: TransactionType, now: i64) -> bool {
        now >= self.release_time(tx_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arbitrary_base_length_matches_layout() {
        assert_eq!(ARBITRARY_BASE_LENGTH, 8 + 64 + 32 + 4 + 4 + 8 + 64);
        assert_eq!(ARBITRARY_BASE_LENGTH, 184);
    }

    #[test]
    fn payload_bounds_sanity() {
        assert!(MIN_ARBITRARY_DATA_LENGTH < MAX_ARBITRARY_DATA_LENGTH);
        assert_eq!(MIN_ARBITRARY_DATA_LENGTH, 1);
    }

    #[test]
    fn amount_scale_matches_decimals() {
        assert_eq!(AMOUNT_SCALE, 10i64.pow(AMOUNT_DECIMALS));
    }

    #[test]
    fn default_config_uses_mainnet_schedule() {
        let config = ProtocolConfig::default();
        assert_eq!(
            config.release_time(TransactionType::Arbitrary),
            ARBITRARY_TRANSACTIONS_RELEASE
        );
        assert!(!config.is_released(TransactionType::Arbitrary, ARBITRARY_TRANSACTIONS_RELEASE - 1));
        assert!(config.is_released(TransactionType::Arbitrary, ARBITRARY_TRANSACTIONS_RELEASE));
    }

    #[test]
    fn empty_json_object_is_a_valid_config() {
        let config: ProtocolConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ProtocolConfig::default());

        let config: ProtocolConfig =
            serde_json::from_str(r#"{"arbitrary_release": 0}"#).unwrap();
        assert_eq!(config, ProtocolConfig::all_released());
    }
}
