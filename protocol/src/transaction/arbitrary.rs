//! The arbitrary-payload transaction.
//!
//! Carries up to 4000 opaque bytes tagged with a service number. The ledger
//! does not interpret the payload at all; its only effect on state is the
//! fee it burns and the link it adds to the creator's reference chain.
//!
//! # Wire Layout
//!
//! ```text
//! type        4   big-endian u32 (10)
//! timestamp   8   big-endian i64, ms
//! reference  64   signature of the creator's previous transaction
//! creator    32   Ed25519 public key
//! service     4   big-endian i32
//! data_len    4   big-endian i32
//! data        *   data_len bytes
//! fee         8   big-endian i64, 10^-8 units
//! signature  64   Ed25519 over everything above
//! ```

use bytes::BufMut;
use serde_json::{json, Value};
use tracing::{debug, error, trace};

use super::codec::{put_length_prefixed, put_type_tag, DecodeError, WireReader};
use super::types::{Amount, TransactionType};
use super::verification::TransactionError;
use crate::config::{
    ProtocolConfig, ARBITRARY_BASE_LENGTH, FEE_LENGTH, MAX_ARBITRARY_DATA_LENGTH,
    MIN_ARBITRARY_DATA_LENGTH, SIGNATURE_LENGTH, TYPE_LENGTH,
};
use crate::crypto::keys::{QuillPublicKey, QuillSignature};
use crate::crypto::signatures::verify;
use crate::identity::Address;
use crate::ledger::{LedgerSnapshot, StateError};

/// A signed arbitrary-payload transaction. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitraryTransaction {
    creator: QuillPublicKey,
    service: i32,
    data: Vec<u8>,
    fee: Amount,
    timestamp: i64,
    reference: QuillSignature,
    signature: QuillSignature,
}

/// Write every signed field of an arbitrary transaction, in wire order.
///
/// Shared by encoding, verification, and the signing flow so the three can
/// never disagree about what the signature covers.
pub(crate) fn write_signing_payload(
    buf: &mut Vec<u8>,
    creator: &QuillPublicKey,
    service: i32,
    data: &[u8],
    fee: Amount,
    timestamp: i64,
    reference: &QuillSignature,
) {
    put_type_tag(buf, TransactionType::Arbitrary.tag());
    buf.put_i64(timestamp);
    buf.put_slice(reference.as_bytes());
    buf.put_slice(creator.as_bytes());
    buf.put_i32(service);
    put_length_prefixed(buf, data);
    buf.put_slice(&fee.to_be_bytes());
}

impl ArbitraryTransaction {
    pub fn new(
        creator: QuillPublicKey,
        service: i32,
        data: Vec<u8>,
        fee: Amount,
        timestamp: i64,
        reference: QuillSignature,
        signature: QuillSignature,
    ) -> Self {
        Self {
            creator,
            service,
            data,
            fee,
            timestamp,
            reference,
            signature,
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn creator(&self) -> &QuillPublicKey {
        &self.creator
    }

    pub fn service(&self) -> i32 {
        self.service
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn fee(&self) -> Amount {
        self.fee
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn reference(&self) -> &QuillSignature {
        &self.reference
    }

    pub fn signature(&self) -> &QuillSignature {
        &self.signature
    }

    /// Address of the creator, derived from the public key.
    pub fn creator_address(&self) -> Address {
        Address::from_public_key(&self.creator)
    }

    // -- codec --------------------------------------------------------------

    /// Total encoded length: type tag + fixed base + payload.
    pub fn data_length(&self) -> usize {
        TYPE_LENGTH + ARBITRARY_BASE_LENGTH + self.data.len()
    }

    /// The exact bytes covered by the signature: the full encoding minus
    /// the trailing signature.
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.data_length() - SIGNATURE_LENGTH);
        write_signing_payload(
            &mut buf,
            &self.creator,
            self.service,
            &self.data,
            self.fee,
            self.timestamp,
            &self.reference,
        );
        buf
    }

    /// Canonical wire encoding.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = self.signing_payload();
        buf.put_slice(self.signature.as_bytes());
        buf
    }

    /// Decode everything after the type tag.
    ///
    /// Checks shape only: lengths and field boundaries. Bytes past the
    /// signature are ignored; a block parser slices each transaction by
    /// [`data_length`](Self::data_length).
    pub(crate) fn decode_body(body: &[u8]) -> Result<Self, DecodeError> {
        if body.len() < ARBITRARY_BASE_LENGTH {
            return Err(DecodeError::TooShort {
                expected: TYPE_LENGTH + ARBITRARY_BASE_LENGTH,
                actual: TYPE_LENGTH + body.len(),
            });
        }

        let mut reader = WireReader::new(body);
        let timestamp = reader.read_i64("timestamp")?;
        let reference = QuillSignature::from_bytes(reader.read_array("reference")?);
        let creator = QuillPublicKey::from_bytes(reader.read_array("creator")?);
        let service = reader.read_i32("service")?;

        let data_len = reader.read_length("data")?;
        if reader.remaining() < data_len.saturating_add(FEE_LENGTH + SIGNATURE_LENGTH) {
            return Err(DecodeError::TooShort {
                expected: (TYPE_LENGTH + ARBITRARY_BASE_LENGTH).saturating_add(data_len),
                actual: TYPE_LENGTH + body.len(),
            });
        }

        let data = reader.read_vec("data", data_len)?;
        let fee = Amount::from_be_bytes(reader.read_array("fee")?);
        let signature = QuillSignature::from_bytes(reader.read_array("signature")?);

        Ok(Self::new(
            creator, service, data, fee, timestamp, reference, signature,
        ))
    }

    // -- authentication -----------------------------------------------------

    /// `true` iff the signature verifies against the creator's key over
    /// [`signing_payload`](Self::signing_payload). Independent of ledger
    /// state.
    pub fn is_signature_valid(&self) -> bool {
        verify(&self.creator, &self.signature, &self.signing_payload())
    }

    // -- validation ---------------------------------------------------------

    /// Validate against a ledger snapshot at time `now` (ms).
    ///
    /// The check order is part of the contract; the first failure wins:
    ///
    /// 1. release gate
    /// 2. payload length within `[1, 4000]`
    /// 3. balance covers the fee
    /// 4. reference equals the creator's last reference
    /// 5. fee is positive
    ///
    /// Never mutates the snapshot.
    pub fn validate<L>(
        &self,
        ledger: &L,
        now: i64,
        config: &ProtocolConfig,
    ) -> Result<(), TransactionError>
    where
        L: LedgerSnapshot + ?Sized,
    {
        let outcome = self.check(ledger, now, config);
        if let Err(ref e) = outcome {
            debug!(
                id = %self.signature,
                creator = %self.creator_address(),
                code = e.code().as_u16(),
                error = %e,
                "arbitrary transaction rejected"
            );
        }
        outcome
    }

    fn check<L>(&self, ledger: &L, now: i64, config: &ProtocolConfig) -> Result<(), TransactionError>
    where
        L: LedgerSnapshot + ?Sized,
    {
        let tx_type = TransactionType::Arbitrary;
        if !config.is_released(tx_type, now) {
            return Err(TransactionError::NotYetReleased {
                tx_type,
                release: config.release_time(tx_type),
                now,
            });
        }

        let length = self.data.len();
        if !(MIN_ARBITRARY_DATA_LENGTH..=MAX_ARBITRARY_DATA_LENGTH).contains(&length) {
            return Err(TransactionError::InvalidPayloadLength {
                length,
                min: MIN_ARBITRARY_DATA_LENGTH,
                max: MAX_ARBITRARY_DATA_LENGTH,
            });
        }

        let creator = self.creator_address();
        let available = ledger.confirmed_balance(&creator);
        if available < self.fee {
            return Err(TransactionError::InsufficientBalance {
                available,
                fee: self.fee,
            });
        }

        if ledger.last_reference(&creator).as_ref() != Some(&self.reference) {
            return Err(TransactionError::InvalidReference);
        }

        if !self.fee.is_positive() {
            return Err(TransactionError::NonPositiveFee { fee: self.fee });
        }

        Ok(())
    }

    // -- state application --------------------------------------------------

    /// Apply: burn the fee and advance the creator's reference chain to
    /// this transaction's signature.
    ///
    /// Does not re-validate.
    ///
    /// # Errors
    ///
    /// [`StateError::BalanceOverflow`] if the debit overflows. That can
    /// only happen for a transaction that was never validated and must be
    /// treated as fatal.
    pub fn process<L>(&self, ledger: &mut L) -> Result<(), StateError>
    where
        L: LedgerSnapshot + ?Sized,
    {
        let creator = self.creator_address();
        let balance = ledger.confirmed_balance(&creator);
        let updated = balance.checked_sub(self.fee).ok_or_else(|| {
            error!(creator = %creator, %balance, fee = %self.fee, "fee debit overflowed");
            StateError::BalanceOverflow {
                account: creator,
                balance,
                fee: self.fee,
                operation: "debit",
            }
        })?;

        ledger.set_confirmed_balance(&creator, updated);
        ledger.set_last_reference(&creator, self.signature);

        trace!(id = %self.signature, creator = %creator, balance = %updated, "processed arbitrary transaction");
        Ok(())
    }

    /// Revert: refund the fee and rewind the creator's reference chain to
    /// this transaction's `reference`. Exact inverse of [`process`](Self::process).
    ///
    /// # Errors
    ///
    /// [`StateError::NotLatest`] if this is not the creator's most recently
    /// applied transaction, meaning the caller is orphaning out of order.
    /// [`StateError::BalanceOverflow`] if the refund overflows. Both are
    /// fatal consistency errors.
    pub fn orphan<L>(&self, ledger: &mut L) -> Result<(), StateError>
    where
        L: LedgerSnapshot + ?Sized,
    {
        let creator = self.creator_address();

        if ledger.last_reference(&creator).as_ref() != Some(&self.signature) {
            error!(id = %self.signature, creator = %creator, "orphaning a transaction that is not the latest applied");
            return Err(StateError::NotLatest {
                account: creator,
                signature: self.signature,
            });
        }

        let balance = ledger.confirmed_balance(&creator);
        let updated = balance.checked_add(self.fee).ok_or_else(|| {
            error!(creator = %creator, %balance, fee = %self.fee, "fee refund overflowed");
            StateError::BalanceOverflow {
                account: creator,
                balance,
                fee: self.fee,
                operation: "refund",
            }
        })?;

        ledger.set_confirmed_balance(&creator, updated);
        ledger.set_last_reference(&creator, self.reference);

        trace!(id = %self.signature, creator = %creator, balance = %updated, "orphaned arbitrary transaction");
        Ok(())
    }

    // -- involvement --------------------------------------------------------

    /// Accounts whose state this transaction touches: just the creator.
    pub fn involved_accounts(&self) -> Vec<Address> {
        vec![self.creator_address()]
    }

    pub fn is_involved(&self, account: &Address) -> bool {
        *account == self.creator_address()
    }

    /// Net effect on `account`: minus the fee for the creator, zero for
    /// everyone else.
    ///
    /// `None` when the creator's effect is not representable, which only
    /// happens for a fee of `i64::MIN` units. Such a transaction never
    /// validates, but it still decodes.
    pub fn amount(&self, account: &Address) -> Option<Amount> {
        if self.is_involved(account) {
            self.fee.checked_neg()
        } else {
            Some(Amount::ZERO)
        }
    }

    // -- presentation -------------------------------------------------------

    /// Variant-specific JSON fields, merged into the shared base by
    /// [`Transaction::to_json`](super::Transaction::to_json).
    pub(crate) fn json_fields(&self) -> Value {
        json!({
            "creator": self.creator_address().to_base58(),
            "service": self.service,
            "data": bs58::encode(&self.data).into_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
