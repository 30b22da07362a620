//! The ledger interface transactions read and write.

use thiserror::Error;

use crate::crypto::keys::QuillSignature;
use crate::identity::Address;
use crate::transaction::types::Amount;

/// Per-account state visible to transactions.
///
/// Reads of an account that has never been written return a zero balance
/// and no last reference. Writes are total: implementations must not fail.
/// Validation only ever takes `&self`; `process` and `orphan` take
/// `&mut self` and are the only mutators.
pub trait LedgerSnapshot {
    /// Confirmed balance of `account`.
    fn confirmed_balance(&self, account: &Address) -> Amount;

    /// Overwrite the confirmed balance of `account`.
    fn set_confirmed_balance(&mut self, account: &Address, balance: Amount);

    /// Signature of the most recent transaction applied for `account`.
    fn last_reference(&self, account: &Address) -> Option<QuillSignature>;

    /// Overwrite the last reference of `account`.
    fn set_last_reference(&mut self, account: &Address, reference: QuillSignature);
}

/// Consistency failures while applying or reverting a transaction.
///
/// None of these can happen for a transaction that passed validation
/// against the same state; seeing one means the caller skipped a step or
/// replayed out of order, and the block being applied must be abandoned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    /// Debiting or refunding `fee` leaves the representable range.
    #[error("balance overflow on {account}: {operation} of {fee} against {balance}")]
    BalanceOverflow {
        account: Address,
        balance: Amount,
        fee: Amount,
        /// `"debit"` or `"refund"`.
        operation: &'static str,
    },

    /// Tried to orphan a transaction that is not the account's latest.
    #[error("transaction {signature} is not the latest applied for {account}")]
    NotLatest {
        account: Address,
        signature: QuillSignature,
    },
}
