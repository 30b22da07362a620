//! Fluent builder for arbitrary-payload transactions.
//!
//! # Example
//!
//! ```rust
//! use quill_protocol::crypto::keys::{QuillKeypair, QuillSignature};
//! use quill_protocol::transaction::{Amount, ArbitraryTransactionBuilder};
//!
//! let keypair = QuillKeypair::generate();
//! let tx = ArbitraryTransactionBuilder::new(7)
//!     .data(b"hello".to_vec())
//!     .fee(Amount::from_units(100_000))
//!     .sign_with_reference(&keypair, QuillSignature::from_bytes([0u8; 64]));
//!
//! assert!(tx.is_signature_valid());
//! ```
//!
//! The builder sets `timestamp` to the current UTC time by default; it can
//! be overridden. The fee defaults to zero, which validation rejects, so
//! callers are expected to set one.

use chrono::Utc;

use super::arbitrary::ArbitraryTransaction;
use super::signing::{current_reference, sign_arbitrary, SigningError};
use super::types::Amount;
use crate::crypto::keys::{QuillKeypair, QuillSignature};
use crate::ledger::LedgerSnapshot;

#[derive(Debug, Clone)]
pub struct ArbitraryTransactionBuilder {
    service: i32,
    data: Vec<u8>,
    fee: Amount,
    timestamp: Option<i64>,
}

impl ArbitraryTransactionBuilder {
    /// Creates a new builder for the given service number.
    pub fn new(service: i32) -> Self {
        Self {
            service,
            data: Vec::new(),
            fee: Amount::ZERO,
            timestamp: None,
        }
    }

    /// Sets the opaque payload.
    pub fn data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Sets the fee.
    pub fn fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }

    /// Sets the timestamp explicitly (Unix milliseconds).
    ///
    /// If not called, signing uses the current UTC time.
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Signs against the creator's current last reference in `ledger`.
    ///
    /// # Errors
    ///
    /// [`SigningError::NoLastReference`] if the creator has no applied
    /// transaction to chain from.
    pub fn sign_with_ledger<L>(
        self,
        keypair: &QuillKeypair,
        ledger: &L,
    ) -> Result<ArbitraryTransaction, SigningError>
    where
        L: LedgerSnapshot + ?Sized,
    {
        let reference = current_reference(ledger, keypair)?;
        Ok(self.sign_with_reference(keypair, reference))
    }

    /// Signs with an explicit reference. Use this only when the reference
    /// is known to be current, e.g. when chaining several transactions
    /// that have not been applied yet.
    pub fn sign_with_reference(
        self,
        keypair: &QuillKeypair,
        reference: QuillSignature,
    ) -> ArbitraryTransaction {
        let timestamp = self
            .timestamp
            .unwrap_or_else(|| Utc::now().timestamp_millis());
        let signature = sign_arbitrary(
            keypair,
            self.service,
            &self.data,
            self.fee,
            timestamp,
            &reference,
        );

        ArbitraryTransaction::new(
            keypair.public_key(),
            self.service,
            self.data,
            self.fee,
            timestamp,
            reference,
            signature,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Address;
    use crate::ledger::MemoryLedger;

    #[test]
    fn builder_sets_all_fields() {
        let kp = QuillKeypair::from_seed(&[4u8; 32]);
        let reference = QuillSignature::from_bytes([6u8; 64]);
        let tx = ArbitraryTransactionBuilder::new(42)
            .data(vec![1, 2, 3])
            .fee(Amount::from_units(500))
            .timestamp(1_500_000_000_000)
            .sign_with_reference(&kp, reference);

        assert_eq!(tx.service(), 42);
        assert_eq!(tx.data(), &[1, 2, 3]);
        assert_eq!(tx.fee(), Amount::from_units(500));
        assert_eq!(tx.timestamp(), 1_500_000_000_000);
        assert_eq!(tx.reference(), &reference);
        assert_eq!(tx.creator(), &kp.public_key());
        assert!(tx.is_signature_valid());
    }

    #[test]
    fn default_timestamp_is_now() {
        let before = Utc::now().timestamp_millis();
        let tx = ArbitraryTransactionBuilder::new(0)
            .data(vec![0])
            .fee(Amount::from_units(1))
            .sign_with_reference(&QuillKeypair::generate(), QuillSignature::from_bytes([0u8; 64]));
        let after = Utc::now().timestamp_millis();
        assert!(tx.timestamp() >= before && tx.timestamp() <= after);
    }

    #[test]
    fn sign_with_ledger_uses_current_reference() {
        let kp = QuillKeypair::generate();
        let creator = Address::from_public_key(&kp.public_key());
        let r0 = QuillSignature::from_bytes([1u8; 64]);
        let mut ledger = MemoryLedger::new();
        ledger.seed_account(creator, Amount::from_units(1_000), r0);

        let tx = ArbitraryTransactionBuilder::new(1)
            .data(b"a".to_vec())
            .fee(Amount::from_units(1))
            .sign_with_ledger(&kp, &ledger)
            .unwrap();
        assert_eq!(tx.reference(), &r0);
    }

    #[test]
    fn sign_with_ledger_requires_history() {
        let kp = QuillKeypair::generate();
        let ledger = MemoryLedger::new();
        let err = ArbitraryTransactionBuilder::new(1)
            .data(b"a".to_vec())
            .fee(Amount::from_units(1))
            .sign_with_ledger(&kp, &ledger)
            .unwrap_err();
        assert_eq!(
            err,
            SigningError::NoLastReference(Address::from_public_key(&kp.public_key()))
        );
    }
}
