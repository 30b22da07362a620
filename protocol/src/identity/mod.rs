//! # Identity Module
//!
//! Every account on the ledger is an Ed25519 public key. What users see,
//! share, and paste is the [`Address`] derived from it: Base58, versioned,
//! checksummed.

pub mod address;

pub use address::{Address, AddressError};
