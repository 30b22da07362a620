//! # Ledger Module
//!
//! The account state transactions operate on, behind the
//! [`LedgerSnapshot`] trait, plus an in-memory implementation and batch
//! replay helpers for block application and reorganization.
//!
//! ```text
//! snapshot.rs - LedgerSnapshot trait and StateError
//! memory.rs   - BTreeMap-backed MemoryLedger with a Merkle fingerprint
//! replay.rs   - process_all / orphan_all over ordered batches
//! ```

pub mod memory;
pub mod replay;
pub mod snapshot;

pub use memory::{AccountState, MemoryLedger};
pub use replay::{orphan_all, process_all, ReplayError};
pub use snapshot::{LedgerSnapshot, StateError};
