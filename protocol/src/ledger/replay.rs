//! Applying and reverting ordered batches of transactions.
//!
//! A block is processed front to back and orphaned back to front. Both
//! helpers are all-or-nothing: if any transaction fails, the ones already
//! handled in this call are undone before the error is returned.

use thiserror::Error;
use tracing::{debug, error};

use super::snapshot::{LedgerSnapshot, StateError};
use crate::transaction::Transaction;

/// A batch failed at `index` (position in the slice passed in).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transaction {index} of batch failed: {source}")]
pub struct ReplayError {
    pub index: usize,
    #[source]
    pub source: StateError,
}

/// Process `txs` in order.
///
/// # Errors
///
/// The first [`StateError`], with its position. The ledger is left as it
/// was before the call.
pub fn process_all<L>(txs: &[Transaction], ledger: &mut L) -> Result<(), ReplayError>
where
    L: LedgerSnapshot + ?Sized,
{
    for (index, tx) in txs.iter().enumerate() {
        if let Err(source) = tx.process(ledger) {
            rollback(txs[..index].iter().rev(), ledger, |tx, l| tx.orphan(l));
            return Err(ReplayError { index, source });
        }
    }
    debug!(count = txs.len(), "processed batch");
    Ok(())
}

/// Orphan `txs` in reverse order, undoing a prior [`process_all`] of the
/// same slice.
///
/// # Errors
///
/// The first [`StateError`], with its position in `txs`. The ledger is left
/// as it was before the call.
pub fn orphan_all<L>(txs: &[Transaction], ledger: &mut L) -> Result<(), ReplayError>
where
    L: LedgerSnapshot + ?Sized,
{
    for (index, tx) in txs.iter().enumerate().rev() {
        if let Err(source) = tx.orphan(ledger) {
            rollback(txs[index + 1..].iter(), ledger, |tx, l| tx.process(l));
            return Err(ReplayError { index, source });
        }
    }
    debug!(count = txs.len(), "orphaned batch");
    Ok(())
}

fn rollback<'a, L, I, F>(txs: I, ledger: &mut L, undo: F)
where
    L: LedgerSnapshot + ?Sized,
    I: Iterator<Item = &'a Transaction>,
    F: Fn(&Transaction, &mut L) -> Result<(), StateError>,
{
    for tx in txs {
        // Undoing a step that just succeeded cannot fail on a consistent
        // ledger.
        if let Err(e) = undo(tx, ledger) {
            error!(id = %tx.signature(), error = %e, "rollback failed; ledger is inconsistent");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
