//! # ledgerwire-protocol
//!
//! The declarative protocol description and its consistency validator.
//!
//! The description (`protocol.json`) is the authoritative listing of field
//! (name, type, code) triples and per-kind formats. It is loaded
//! independently of the compiled tables in `ledgerwire-core`; the
//! [`validator`] cross-checks the two at build/test time and reports every
//! discrepancy in one batch rather than stopping at the first.

pub mod description;
pub mod error;
pub mod validator;

pub use description::{FieldEntry, KindEntry, ProtocolDescription};
pub use error::ProtocolError;
pub use validator::{ensure_consistent, validate, Violation};
