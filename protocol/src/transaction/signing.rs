//! Signing flow for new transactions.
//!
//! A reference is only meaningful relative to live ledger state: it must
//! equal the creator's last-applied signature at the moment the transaction
//! is validated. The signing flow therefore reads the creator's *current*
//! reference from the snapshot right before it signs, rather than trusting
//! a value the caller cached earlier.

use thiserror::Error;

use super::arbitrary::write_signing_payload;
use super::types::Amount;
use crate::crypto::keys::{QuillKeypair, QuillSignature};
use crate::crypto::signatures::sign;
use crate::identity::Address;
use crate::ledger::LedgerSnapshot;

/// Errors from the ledger-aware signing flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The creator has never had a transaction applied, so there is
    /// nothing to reference.
    #[error("account {0} has no last reference to build on")]
    NoLastReference(Address),
}

/// Look up the reference a new transaction by `keypair` must carry.
pub fn current_reference<L>(ledger: &L, keypair: &QuillKeypair) -> Result<QuillSignature, SigningError>
where
    L: LedgerSnapshot + ?Sized,
{
    let creator = Address::from_public_key(&keypair.public_key());
    ledger
        .last_reference(&creator)
        .ok_or(SigningError::NoLastReference(creator))
}

/// Sign the fields of an arbitrary transaction.
///
/// Builds the same signing payload that verification rebuilds from a
/// decoded transaction, and signs it with the creator's key.
pub fn sign_arbitrary(
    keypair: &QuillKeypair,
    service: i32,
    data: &[u8],
    fee: Amount,
    timestamp: i64,
    reference: &QuillSignature,
) -> QuillSignature {
    let mut payload = Vec::with_capacity(crate::config::ARBITRARY_BASE_LENGTH + data.len());
    write_signing_payload(
        &mut payload,
        &keypair.public_key(),
        service,
        data,
        fee,
        timestamp,
        reference,
    );
    sign(keypair, &payload)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
