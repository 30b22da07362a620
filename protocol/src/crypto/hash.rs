//! # Hashing Utilities
//!
//! Two hash functions, two jobs:
//!
//! - **SHA-256** (doubled) for address checksums, where the construction is
//!   part of the address format and must never change.
//! - **BLAKE3** for key hashes inside addresses and for ledger fingerprints,
//!   where we only need a fast, collision-resistant digest.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute `SHA-256(SHA-256(data))`.
///
/// # Example
///
/// ```
/// use quill_protocol::crypto::double_sha256;
///
/// let digest = double_sha256(b"address body");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute the BLAKE3 hash of the input data.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Hash several byte slices in sequence without concatenating them first.
pub fn blake3_hash_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

/// Compute a binary Merkle root over leaf hashes using BLAKE3.
///
/// An odd node at any level is paired with itself. An empty input returns
/// all zeros.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    if leaves.is_empty() {
        return [0u8; 32];
    }

    let mut level: Vec<[u8; 32]> = leaves.to_vec();
    if level.len() == 1 {
        return blake3_hash_multi(&[level[0].as_slice(), level[0].as_slice()]);
    }

    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let right = pair.get(1).unwrap_or(&pair[0]);
                blake3_hash_multi(&[pair[0].as_slice(), right.as_slice()])
            })
            .collect();
    }

    level[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn double_sha256_differs_from_single() {
        assert_ne!(double_sha256(b"quill"), sha256(b"quill"));
        assert_eq!(double_sha256(b"quill"), sha256(&sha256(b"quill")));
    }

    #[test]
    fn blake3_multi_matches_concatenation() {
        assert_eq!(
            blake3_hash_multi(&[b"foo", b"bar"]),
            blake3_hash(b"foobar")
        );
    }

    #[test]
    fn merkle_root_empty_is_zero() {
        assert_eq!(merkle_root(&[]), [0u8; 32]);
    }

    #[test]
    fn merkle_root_is_order_sensitive() {
        let a = blake3_hash(b"a");
        let b = blake3_hash(b"b");
        assert_ne!(merkle_root(&[a, b]), merkle_root(&[b, a]));
    }

    #[test]
    fn merkle_root_odd_leaf_is_duplicated() {
        let a = blake3_hash(b"a");
        let b = blake3_hash(b"b");
        let c = blake3_hash(b"c");
        assert_eq!(merkle_root(&[a, b, c]), merkle_root(&[a, b, c, c]));
    }
}
