//! Transaction admission: the shared error space and the check that every
//! transaction passes before it may enter a block.
//!
//! [`verify_transaction`] runs the cheap, state-independent signature check
//! first and only then asks the variant to validate itself against the
//! ledger. Each rejection carries a stable numeric [`ResultCode`]; those
//! numbers are shared by every transaction variant and are never reused.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::codec::DecodeError;
use super::envelope::Transaction;
use super::types::{Amount, TransactionType};
use crate::clock::Clock;
use crate::config::ProtocolConfig;
use crate::ledger::LedgerSnapshot;

// ---------------------------------------------------------------------------
// Result codes
// ---------------------------------------------------------------------------

/// Numeric outcome of validation, shared across all transaction variants.
///
/// Gaps in the numbering belong to variants that are not implemented in
/// this crate. Do not fill them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum ResultCode {
    Valid = 1,
    NonPositiveFee = 4,
    InsufficientBalance = 5,
    InvalidReference = 6,
    InvalidPayloadLength = 27,
    NotYetReleased = 1000,
    SignatureInvalid = 1001,
    MalformedEncoding = 1002,
}

impl ResultCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Every way a transaction can be refused.
///
/// Validation failures are recoverable: the transaction is left out of the
/// block or pool and nothing else happens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    /// The bytes do not describe a transaction at all.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(#[from] DecodeError),

    /// The signature does not verify against the creator's key.
    #[error("invalid signature")]
    SignatureInvalid,

    /// The variant is not active yet.
    #[error("{tx_type} transactions are not released until {release} (now {now})")]
    NotYetReleased {
        tx_type: TransactionType,
        release: i64,
        now: i64,
    },

    /// Payload length outside the accepted bounds.
    #[error("invalid payload length {length}: must be within [{min}, {max}]")]
    InvalidPayloadLength { length: usize, min: usize, max: usize },

    /// The creator cannot cover the fee.
    #[error("insufficient balance: available {available}, fee {fee}")]
    InsufficientBalance { available: Amount, fee: Amount },

    /// The reference does not point at the creator's latest transaction.
    #[error("reference does not match the creator's last transaction")]
    InvalidReference,

    /// Zero or negative fee.
    #[error("fee must be positive, got {fee}")]
    NonPositiveFee { fee: Amount },
}

impl TransactionError {
    /// Stable numeric code for this rejection.
    pub fn code(&self) -> ResultCode {
        match self {
            Self::MalformedEncoding(_) => ResultCode::MalformedEncoding,
            Self::SignatureInvalid => ResultCode::SignatureInvalid,
            Self::NotYetReleased { .. } => ResultCode::NotYetReleased,
            Self::InvalidPayloadLength { .. } => ResultCode::InvalidPayloadLength,
            Self::InsufficientBalance { .. } => ResultCode::InsufficientBalance,
            Self::InvalidReference => ResultCode::InvalidReference,
            Self::NonPositiveFee { .. } => ResultCode::NonPositiveFee,
        }
    }
}

/// Collapse a validation outcome to its numeric code.
pub fn result_code(outcome: &Result<(), TransactionError>) -> ResultCode {
    match outcome {
        Ok(()) => ResultCode::Valid,
        Err(e) => e.code(),
    }
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Full admission check: signature first, then ledger validation.
///
/// The signature check is independent of ledger state and runs first so
/// that forged transactions never cost a ledger read.
///
/// # Errors
///
/// [`TransactionError::SignatureInvalid`] or the first failing validation
/// check of the variant.
pub fn verify_transaction<L, C>(
    tx: &Transaction,
    ledger: &L,
    clock: &C,
    config: &ProtocolConfig,
) -> Result<(), TransactionError>
where
    L: LedgerSnapshot + ?Sized,
    C: Clock + ?Sized,
{
    if !tx.is_signature_valid() {
        debug!(id = %tx.signature(), "rejected transaction with invalid signature");
        return Err(TransactionError::SignatureInvalid);
    }

    tx.validate(ledger, clock.now(), config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::crypto::keys::{QuillKeypair, QuillSignature};
    use crate::identity::Address;
    use crate::ledger::MemoryLedger;
    use crate::transaction::builder::ArbitraryTransactionBuilder;

    const NOW: i64 = 1_700_000_000_000;

    fn funded_ledger(kp: &QuillKeypair) -> (MemoryLedger, QuillSignature) {
        let r0 = QuillSignature::from_bytes([9u8; 64]);
        let mut ledger = MemoryLedger::new();
        ledger.seed_account(
            Address::from_public_key(&kp.public_key()),
            Amount::from_coins(10).unwrap(),
            r0,
        );
        (ledger, r0)
    }

    #[test]
    fn codes_are_distinct() {
        let codes = [
            ResultCode::Valid,
            ResultCode::NonPositiveFee,
            ResultCode::InsufficientBalance,
            ResultCode::InvalidReference,
            ResultCode::InvalidPayloadLength,
            ResultCode::NotYetReleased,
            ResultCode::SignatureInvalid,
            ResultCode::MalformedEncoding,
        ];
        let mut numbers: Vec<u16> = codes.iter().map(|c| c.as_u16()).collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), codes.len());
        assert_eq!(ResultCode::Valid.as_u16(), 1);
        assert_eq!(ResultCode::NotYetReleased.as_u16(), 1000);
    }

    #[test]
    fn error_maps_to_code() {
        assert_eq!(
            TransactionError::InvalidReference.code(),
            ResultCode::InvalidReference
        );
        assert_eq!(
            TransactionError::from(DecodeError::UnknownType(99)).code(),
            ResultCode::MalformedEncoding
        );
        assert_eq!(result_code(&Ok(())), ResultCode::Valid);
    }

    #[test]
    fn valid_transaction_passes() {
        let kp = QuillKeypair::generate();
        let (ledger, _) = funded_ledger(&kp);
        let tx = ArbitraryTransactionBuilder::new(1)
            .data(b"abc".to_vec())
            .fee(Amount::from_units(100))
            .timestamp(NOW)
            .sign_with_ledger(&kp, &ledger)
            .unwrap();

        let outcome = verify_transaction(
            &tx.into(),
            &ledger,
            &FixedClock::new(NOW),
            &ProtocolConfig::default(),
        );
        assert_eq!(outcome, Ok(()));
    }

    #[test]
    fn signature_is_checked_before_state() {
        // Wrong signer AND a bad reference: the signature failure wins.
        let kp = QuillKeypair::generate();
        let imposter = QuillKeypair::generate();
        let (ledger, _) = funded_ledger(&kp);

        let forged = ArbitraryTransactionBuilder::new(1)
            .data(b"abc".to_vec())
            .fee(Amount::from_units(100))
            .timestamp(NOW)
            .sign_with_reference(&imposter, QuillSignature::from_bytes([1u8; 64]));
        let forged = crate::transaction::ArbitraryTransaction::new(
            kp.public_key(),
            forged.service(),
            forged.data().to_vec(),
            forged.fee(),
            forged.timestamp(),
            *forged.reference(),
            *forged.signature(),
        );

        let outcome = verify_transaction(
            &forged.into(),
            &ledger,
            &FixedClock::new(NOW),
            &ProtocolConfig::default(),
        );
        assert_eq!(outcome, Err(TransactionError::SignatureInvalid));
        assert_eq!(result_code(&outcome), ResultCode::SignatureInvalid);
    }
}
