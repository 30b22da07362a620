//! In-memory ledger.
//!
//! A sorted map of accounts with a Merkle fingerprint over the whole state.
//! Used by tests, the CLI, and any caller that wants to dry-run a batch of
//! transactions before touching real storage.
//!
//! ```text
//! leaves = [ BLAKE3(address || balance || reference?) for account in sorted(accounts) ]
//! root   = merkle_root(leaves)
//! ```

use std::collections::BTreeMap;

use crate::crypto::hash::{blake3_hash_multi, merkle_root};
use crate::crypto::keys::QuillSignature;
use crate::identity::Address;
use crate::transaction::types::Amount;

use super::snapshot::LedgerSnapshot;

/// The slice of account state the transaction layer cares about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountState {
    pub balance: Amount,
    pub last_reference: Option<QuillSignature>,
}

impl AccountState {
    fn leaf(&self, address: &Address) -> [u8; 32] {
        let balance = self.balance.to_be_bytes();
        match &self.last_reference {
            Some(reference) => blake3_hash_multi(&[
                address.as_bytes(),
                &balance,
                &[1u8],
                reference.as_bytes(),
            ]),
            None => blake3_hash_multi(&[address.as_bytes(), &balance, &[0u8]]),
        }
    }
}

/// [`LedgerSnapshot`] backed by a `BTreeMap`.
///
/// Accounts are created on first write and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLedger {
    accounts: BTreeMap<Address, AccountState>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `account` a starting balance and reference, as a genesis
    /// allocation would.
    pub fn seed_account(&mut self, account: Address, balance: Amount, reference: QuillSignature) {
        self.accounts.insert(
            account,
            AccountState {
                balance,
                last_reference: Some(reference),
            },
        );
    }

    /// State of `account`, if it was ever written.
    pub fn account(&self, account: &Address) -> Option<&AccountState> {
        self.accounts.get(account)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Merkle root over every account, in address order. An empty ledger
    /// fingerprints to all zeros.
    pub fn fingerprint(&self) -> [u8; 32] {
        let leaves: Vec<[u8; 32]> = self
            .accounts
            .iter()
            .map(|(address, state)| state.leaf(address))
            .collect();
        merkle_root(&leaves)
    }
}

impl LedgerSnapshot for MemoryLedger {
    fn confirmed_balance(&self, account: &Address) -> Amount {
        self.accounts
            .get(account)
            .map(|state| state.balance)
            .unwrap_or_default()
    }

    fn set_confirmed_balance(&mut self, account: &Address, balance: Amount) {
        self.accounts.entry(*account).or_default().balance = balance;
    }

    fn last_reference(&self, account: &Address) -> Option<QuillSignature> {
        self.accounts
            .get(account)
            .and_then(|state| state.last_reference)
    }

    fn set_last_reference(&mut self, account: &Address, reference: QuillSignature) {
        self.accounts.entry(*account).or_default().last_reference = Some(reference);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::QuillKeypair;

    fn address(seed: u8) -> Address {
        Address::from_public_key(&QuillKeypair::from_seed(&[seed; 32]).public_key())
    }

    #[test]
    fn unknown_account_reads_empty() {
        let ledger = MemoryLedger::new();
        let a = address(1);
        assert_eq!(ledger.confirmed_balance(&a), Amount::ZERO);
        assert_eq!(ledger.last_reference(&a), None);
        assert!(ledger.account(&a).is_none());
    }

    #[test]
    fn writes_create_accounts() {
        let mut ledger = MemoryLedger::new();
        let a = address(1);
        ledger.set_confirmed_balance(&a, Amount::from_units(5));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.confirmed_balance(&a), Amount::from_units(5));
        assert_eq!(ledger.last_reference(&a), None);

        let r = QuillSignature::from_bytes([3u8; 64]);
        ledger.set_last_reference(&a, r);
        assert_eq!(ledger.last_reference(&a), Some(r));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn empty_fingerprint_is_zero() {
        assert_eq!(MemoryLedger::new().fingerprint(), [0u8; 32]);
    }

    #[test]
    fn fingerprint_is_order_independent() {
        let r = QuillSignature::from_bytes([7u8; 64]);
        let mut x = MemoryLedger::new();
        x.seed_account(address(1), Amount::from_units(10), r);
        x.seed_account(address(2), Amount::from_units(20), r);

        let mut y = MemoryLedger::new();
        y.seed_account(address(2), Amount::from_units(20), r);
        y.seed_account(address(1), Amount::from_units(10), r);

        assert_eq!(x.fingerprint(), y.fingerprint());
    }

    #[test]
    fn fingerprint_tracks_every_field() {
        let a = address(1);
        let r = QuillSignature::from_bytes([7u8; 64]);
        let mut ledger = MemoryLedger::new();
        ledger.seed_account(a, Amount::from_units(10), r);
        let base = ledger.fingerprint();

        let mut balance_changed = ledger.clone();
        balance_changed.set_confirmed_balance(&a, Amount::from_units(11));
        assert_ne!(balance_changed.fingerprint(), base);

        let mut reference_changed = ledger.clone();
        reference_changed.set_last_reference(&a, QuillSignature::from_bytes([8u8; 64]));
        assert_ne!(reference_changed.fingerprint(), base);
    }

    #[test]
    fn missing_reference_differs_from_present() {
        let a = address(1);
        let mut with = MemoryLedger::new();
        with.seed_account(a, Amount::ZERO, QuillSignature::from_bytes([0u8; 64]));
        let mut without = MemoryLedger::new();
        without.set_confirmed_balance(&a, Amount::ZERO);
        assert_ne!(with.fingerprint(), without.fingerprint());
    }
}
