//! # Key Management
//!
//! Ed25519 keypairs, public keys, and signatures for Quill accounts.
//!
//! Every account on the ledger is an Ed25519 public key. The same 64-byte
//! signature type doubles as the transaction reference: an account's next
//! transaction points back at the signature of its previous one.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (ed25519-dalek does this for us).
//! - Key generation uses `OsRng`. If you are about to swap in a seeded RNG
//!   "just for a test", use [`QuillKeypair::from_seed`] instead.
//! - Key bytes are never logged. If you add logging to this module, you
//!   will be asked to leave.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use crate::config::SIGNATURE_LENGTH;

/// Errors that can occur during key operations.
///
/// Deliberately vague about *why* something failed; error messages are not
/// a good place for details about key material.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not valid hex")]
    InvalidSecretKey,

    #[error("invalid public key bytes: expected 32 bytes")]
    InvalidPublicKey,

    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignature,
}

/// A Quill account keypair wrapping an Ed25519 signing key. Thirty-two
/// bytes of pure responsibility.
///
/// `QuillKeypair` does not implement `Serialize`. Exporting a private key
/// should be a deliberate act, so use [`secret_key_bytes`](Self::secret_key_bytes)
/// explicitly.
///
/// # Examples
///
/// ```
/// use quill_protocol::crypto::keys::QuillKeypair;
///
/// let kp = QuillKeypair::generate();
/// let sig = kp.sign(b"arbitrary payload");
/// assert!(kp.public_key().verify(b"arbitrary payload", &sig));
/// ```
pub struct QuillKeypair {
    signing_key: SigningKey,
}

/// The public half of an account identity. Exactly the 32 bytes that appear
/// in the `creator` field on the wire.
///
/// Construction never checks that the bytes are a valid curve point:
/// decoded transactions may carry garbage keys, and the right outcome for
/// those is a failed verification, not a decode error.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuillPublicKey {
    bytes: [u8; 32],
}

/// A 64-byte Ed25519 signature.
///
/// Also used as a transaction reference, since a reference is by definition
/// the signature of the previous transaction in an account's chain.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct QuillSignature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl QuillKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Constructs a keypair deterministically from a 32-byte seed.
    ///
    /// In Ed25519 the seed *is* the secret key. A weak seed is a weak key.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from a hex-encoded 32-byte seed.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> QuillPublicKey {
        QuillPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message. Ed25519 is deterministic: same key and message, same
    /// signature.
    pub fn sign(&self, message: &[u8]) -> QuillSignature {
        QuillSignature {
            bytes: self.signing_key.sign(message).to_bytes(),
        }
    }

    /// Exports the raw 32-byte secret key. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for QuillKeypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for QuillKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material, not even partially.
        write!(f, "QuillKeypair(pub={})", self.public_key().to_hex())
    }
}

// ---------------------------------------------------------------------------
// QuillPublicKey
// ---------------------------------------------------------------------------

impl QuillPublicKey {
    /// Create a public key from raw bytes. No curve check.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Create a public key from a slice, checking only the length.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature against this public key.
    ///
    /// Returns `false` for any failure, including bytes that do not decode
    /// to a curve point. Never panics.
    pub fn verify(&self, message: &[u8], signature: &QuillSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    /// Hex-encoded representation. 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }
}

impl Hash for QuillPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for QuillPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for QuillPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuillPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// QuillSignature
// ---------------------------------------------------------------------------

impl QuillSignature {
    /// Create a signature from its raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Create a signature from a slice, checking only the length.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; SIGNATURE_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self { bytes })
    }

    /// Returns the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    /// Hex-encoded signature. 128 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Base58-encoded signature. This is how references and transaction
    /// ids are shown to humans.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.bytes).into_string()
    }

    /// Parse a Base58-encoded signature.
    pub fn from_base58(s: &str) -> Result<Self, KeyError> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| KeyError::InvalidSignature)?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for QuillSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for QuillSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "QuillSignature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}
