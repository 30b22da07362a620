//! # Cryptographic Primitives for Quill
//!
//! Thin, typed wrappers around audited implementations:
//!
//! - **Ed25519** for signatures and account identities.
//! - **SHA-256** for address checksums.
//! - **BLAKE3** for key hashes and ledger fingerprints.
//!
//! Nothing in here is hand-rolled. If you are tempted to optimize these
//! functions, don't.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{blake3_hash, double_sha256, merkle_root, sha256};
pub use keys::{KeyError, QuillKeypair, QuillPublicKey, QuillSignature};
pub use signatures::{sign, verify};
