// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Quill Protocol - Transaction Core
//!
//! The transaction layer of an account-based ledger: how transactions are
//! encoded, signed, checked against account state, applied, and reverted.
//! Blocks, gossip, and consensus live elsewhere; this crate is the part that
//! decides whether a handful of bytes is allowed to move money.
//!
//! Every account carries a balance and a *last reference*, the signature of
//! the most recent transaction it created. Each new transaction must cite
//! that signature, which chains an account's history and makes replays
//! impossible without nonces.
//!
//! ## Architecture
//!
//! - **crypto** - Ed25519 keys and signatures, SHA-256 and BLAKE3 hashing.
//! - **identity** - Base58 account addresses derived from public keys.
//! - **transaction** - Wire codec, signing, validation, process/orphan.
//! - **ledger** - The state interface plus an in-memory implementation.
//! - **clock** - Injectable time source for release gating.
//! - **config** - Wire widths, payload bounds, and release schedule.
//!
//! ## Design Philosophy
//!
//! 1. Decoding never panics. Peers will send us garbage, and garbage gets
//!    an error, not a crash.
//! 2. Validation is read-only. Only process and orphan write state.
//! 3. Orphan is the exact inverse of process, so reorganizations are safe.
//! 4. If it touches money, it has tests. Plural.

pub mod clock;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod ledger;
pub mod transaction;
