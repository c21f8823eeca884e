//! Canonical encoding of the signed part of a package
//!
//! ```text
//! "filedrop/package/v1" 0x00
//!   || len32(sender_id)   || sender_id
//!   || len32(receiver_id) || receiver_id
//!   || len32(file_id)     || file_id
//!   || len32(nonce)       || nonce
//!   || len32(ciphertext)  || ciphertext
//!   || len32(wrapped_key) || wrapped_key
//! ```
//!
//! `len32` is a big-endian u32 byte count. The order is fixed; changing it, or
//! adding a field, means bumping `PROTOCOL_VERSION` and the domain tag together.

use sha2::{Digest, Sha256};

/// Current package protocol version
pub const PROTOCOL_VERSION: u32 = 1;
/// Domain separation prefix for the v1 signed digest
pub const DOMAIN_TAG: &[u8] = b"filedrop/package/v1\0";

/// A field in the signed set was too long to length-prefix
#[derive(Debug, thiserror::Error)]
#[error("field '{0}' exceeds u32::MAX bytes")]
pub struct FieldTooLong(pub &'static str);

/// Borrowed view of every field bound by the package signature
#[derive(Debug, Clone, Copy)]
pub struct SignedFields<'a> {
    pub sender_id: &'a str,
    pub receiver_id: &'a str,
    pub file_id: &'a str,
    pub nonce: &'a [u8],
    pub ciphertext: &'a [u8],
    pub wrapped_key: &'a [u8],
}

impl SignedFields<'_> {
    fn ordered(&self) -> [(&'static str, &[u8]); 6] {
        [
            ("sender_id", self.sender_id.as_bytes()),
            ("receiver_id", self.receiver_id.as_bytes()),
            ("file_id", self.file_id.as_bytes()),
            ("nonce", self.nonce),
            ("ciphertext", self.ciphertext),
            ("wrapped_key", self.wrapped_key),
        ]
    }

    /// The exact byte string that gets hashed
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, FieldTooLong> {
        let fields = self.ordered();
        let capacity = DOMAIN_TAG.len() + fields.iter().map(|(_, f)| 4 + f.len()).sum::<usize>();
        let mut out = Vec::with_capacity(capacity);
        out.extend_from_slice(DOMAIN_TAG);
        for (name, field) in fields {
            out.extend_from_slice(&len32(name, field)?);
            out.extend_from_slice(field);
        }
        Ok(out)
    }

    /// SHA-256 of the canonical bytes, computed without buffering the ciphertext
    pub fn digest(&self) -> Result<[u8; 32], FieldTooLong> {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN_TAG);
        for (name, field) in self.ordered() {
            hasher.update(len32(name, field)?);
            hasher.update(field);
        }
        Ok(hasher.finalize().into())
    }
}

fn len32(name: &'static str, field: &[u8]) -> Result<[u8; 4], FieldTooLong> {
    u32::try_from(field.len())
        .map(u32::to_be_bytes)
        .map_err(|_| FieldTooLong(name))
}

#[cfg(test)]
mod test {
    use super::*;

    fn fields<'a>(sender: &'a str, receiver: &'a str) -> SignedFields<'a> {
        SignedFields {
            sender_id: sender,
            receiver_id: receiver,
            file_id: "f1",
            nonce: &[1, 2, 3],
            ciphertext: &[4, 5],
            wrapped_key: &[6],
        }
    }

    #[test]
    fn test_canonical_layout() {
        let bytes = fields("ab", "c").canonical_bytes().unwrap();

        let mut expected = DOMAIN_TAG.to_vec();
        expected.extend_from_slice(&[0, 0, 0, 2, b'a', b'b']);
        expected.extend_from_slice(&[0, 0, 0, 1, b'c']);
        expected.extend_from_slice(&[0, 0, 0, 2, b'f', b'1']);
        expected.extend_from_slice(&[0, 0, 0, 3, 1, 2, 3]);
        expected.extend_from_slice(&[0, 0, 0, 2, 4, 5]);
        expected.extend_from_slice(&[0, 0, 0, 1, 6]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_digest_matches_canonical_bytes() {
        let f = fields("alice", "bob");
        let expected: [u8; 32] = Sha256::digest(f.canonical_bytes().unwrap()).into();
        assert_eq!(f.digest().unwrap(), expected);
    }

    #[test]
    fn test_field_boundaries_are_unambiguous() {
        // Plain concatenation would make these identical
        let a = fields("ab", "c").digest().unwrap();
        let b = fields("a", "bc").digest().unwrap();
        assert_ne!(a, b);
    }
}
