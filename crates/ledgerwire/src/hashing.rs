//! Identity and signing digests over the canonical bytes.
//!
//! Digests are SHA-512-half: the first 32 bytes of SHA-512 over a 4-byte
//! domain prefix followed by the canonical encoding. The prefix keeps a
//! transaction's identity hash, its signing hash, and ledger-entry hashes
//! in separate domains even when the payload bytes coincide.

use sha2::{Digest, Sha512};

use ledgerwire_core::{encode, CodecError, FieldValues, Hash256, Kind};

/// Domain prefixes prepended to canonical bytes before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashPrefix {
    /// Identity hash of a committed transaction.
    TransactionId,
    /// Input to transaction signing.
    TransactionSign,
    /// Identity hash of a ledger entry.
    LedgerEntry,
}

impl HashPrefix {
    /// The 4-byte prefix on the wire.
    pub fn bytes(self) -> [u8; 4] {
        match self {
            HashPrefix::TransactionId => *b"TXN\0",
            HashPrefix::TransactionSign => *b"STX\0",
            HashPrefix::LedgerEntry => *b"MLN\0",
        }
    }
}

/// First 32 bytes of SHA-512 over the input.
pub fn sha512_half(data: &[u8]) -> Hash256 {
    let digest = Sha512::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest[..32]);
    Hash256::from_bytes(out)
}

fn prefixed(prefix: HashPrefix, kind: Kind, values: &FieldValues) -> Result<Vec<u8>, CodecError> {
    let canonical = encode(kind, values)?;
    let mut data = Vec::with_capacity(4 + canonical.len());
    data.extend_from_slice(&prefix.bytes());
    data.extend_from_slice(&canonical);
    Ok(data)
}

/// The bytes a signer hashes and signs: prefix plus canonical encoding.
pub fn signing_data(kind: Kind, values: &FieldValues) -> Result<Vec<u8>, CodecError> {
    prefixed(HashPrefix::TransactionSign, kind, values)
}

/// The signing hash of a transaction.
pub fn signing_hash(kind: Kind, values: &FieldValues) -> Result<Hash256, CodecError> {
    Ok(sha512_half(&signing_data(kind, values)?))
}

/// The identity hash of a committed transaction.
pub fn transaction_id(kind: Kind, values: &FieldValues) -> Result<Hash256, CodecError> {
    Ok(sha512_half(&prefixed(HashPrefix::TransactionId, kind, values)?))
}
