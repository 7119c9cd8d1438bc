//! # ledgerwire-core
//!
//! Canonical binary serialization for a distributed ledger protocol's
//! transactions and ledger entries. This crate contains no I/O: it is pure
//! computation over process-wide immutable tables.
//!
//! ## Key Types
//!
//! - [`TypeId`] - Primitive wire types with stable numeric identifiers
//! - [`FieldId`] - The closed field dictionary, coordinated by (type, code)
//! - [`Format`] - Per-kind field requirements and defaults
//! - [`FieldValues`] - A field/value map with canonical iteration order
//!
//! ## Canonical Encoding
//!
//! [`encode`] and [`decode`] produce and consume the deterministic wire
//! form: fields sorted by (type_id, field_code), compact one-to-three byte
//! tags, strict rejection of anything outside the dictionary or the kind's
//! format. See the [`codec`] module.
//!
//! The tables in [`fields`] and [`formats`] are built once on first use and
//! never mutated; concurrent encode/decode calls share them without locking.

pub mod codec;
pub mod error;
pub mod fields;
pub mod formats;
pub mod types;
pub mod value;

pub use codec::{decode, encode, encode_with, MAX_NESTING_DEPTH, MAX_VL_LENGTH};
pub use error::CodecError;
pub use fields::{Dictionary, FieldId};
pub use formats::{
    format_by_name, format_of, Format, Kind, LedgerEntryKind, Requirement, TransactionKind,
};
pub use types::{AccountId, Amount, Hash128, Hash160, Hash256, TypeId, MAX_DROPS};
pub use value::{FieldValues, Value};
