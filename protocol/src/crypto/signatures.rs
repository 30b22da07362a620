//! # Digital Signatures
//!
//! The signature service every transaction goes through. Sign with a
//! keypair, verify with a public key, nothing else.
//!
//! Verification answers with a plain `bool`. A well-formed but wrong
//! signature is an ordinary outcome on a ledger that accepts bytes from
//! strangers, not an error condition.

use super::keys::{QuillKeypair, QuillPublicKey, QuillSignature};

/// Sign a message with the creator's keypair.
///
/// # Example
///
/// ```
/// use quill_protocol::crypto::{QuillKeypair, sign, verify};
///
/// let keypair = QuillKeypair::generate();
/// let signature = sign(&keypair, b"payload");
/// assert!(verify(&keypair.public_key(), &signature, b"payload"));
/// ```
pub fn sign(keypair: &QuillKeypair, message: &[u8]) -> QuillSignature {
    keypair.sign(message)
}

/// Verify an Ed25519 signature against a public key and message.
///
/// Returns `false` on any mismatch. We do not distinguish "bad key" from
/// "bad signature"; both are just "no".
pub fn verify(public_key: &QuillPublicKey, signature: &QuillSignature, message: &[u8]) -> bool {
    public_key.verify(message, signature)
}
