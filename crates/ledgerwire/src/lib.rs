//! # ledgerwire
//!
//! The unified API for the ledgerwire serialization layer - canonical binary
//! encoding for ledger transactions and entries.
//!
//! ## Overview
//!
//! ledgerwire provides a self-contained library for:
//!
//! - **Codec**: Deterministic, canonical binary encoding and decoding
//! - **Dictionary**: The field and type registries the wire format is built on
//! - **Formats**: Per-kind field requirements for transactions and ledger entries
//! - **Protocol**: A JSON protocol description plus a consistency validator
//! - **Hashing**: Domain-prefixed SHA-512-half digests over canonical bytes
//!
//! ## Key Concepts
//!
//! - **Canonical order**: Fields are always emitted sorted by (type id, field
//!   code). Two equal field sets produce identical bytes.
//! - **Kind**: A transaction type or ledger-entry type. Each kind has a format
//!   naming its required, optional, and defaultable fields.
//! - **Discriminant**: The UInt16 field (`TransactionType` or
//!   `LedgerEntryType`) that identifies the kind on the wire.
//!
//! ## Usage
//!
//! ```rust
//! use ledgerwire::{encode, decode, FieldValues, FieldId, Kind, TransactionKind, Value};
//! use ledgerwire::{AccountId, Amount};
//!
//! let mut values = FieldValues::new();
//! values.insert(FieldId::Account, Value::AccountId(AccountId::from_bytes([1; 20])));
//! values.insert(FieldId::Sequence, Value::UInt32(1));
//! values.insert(FieldId::Fee, Value::Amount(Amount::from_drops(10).unwrap()));
//! values.insert(FieldId::Amount, Value::Amount(Amount::from_drops(100).unwrap()));
//! values.insert(FieldId::Destination, Value::AccountId(AccountId::from_bytes([2; 20])));
//!
//! let kind = Kind::Transaction(TransactionKind::Payment);
//! let bytes = encode(kind, &values).unwrap();
//! let (decoded_kind, decoded) = decode(&bytes).unwrap();
//! assert_eq!(decoded_kind, kind);
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `ledgerwire::core` - Codec, dictionary, formats, value model
//! - `ledgerwire::protocol` - Protocol description and validator
//! - `ledgerwire::curves` - Named elliptic-curve parameters

pub mod hashing;

// Re-export component crates
pub use ledgerwire_core as core;
pub use ledgerwire_curves as curves;
pub use ledgerwire_protocol as protocol;

// Re-export main types for convenience
pub use hashing::{sha512_half, signing_data, signing_hash, transaction_id, HashPrefix};

// Re-export commonly used core types
pub use ledgerwire_core::{
    decode, encode, encode_with, format_by_name, format_of, AccountId, Amount, CodecError,
    Dictionary, FieldId, FieldValues, Format, Hash128, Hash160, Hash256, Kind, LedgerEntryKind,
    Requirement, TransactionKind, TypeId, Value, MAX_DROPS, MAX_NESTING_DEPTH, MAX_VL_LENGTH,
};

pub use ledgerwire_protocol::{ensure_consistent, validate, ProtocolDescription, Violation};
