//! # ledgerwire-testkit
//!
//! Testing utilities for ledgerwire.
//!
//! - **Generators**: proptest strategies producing format-satisfying
//!   transactions and ledger entries
//! - **Fixtures**: deterministic objects for golden vectors and
//!   integration tests
//!
//! ```rust
//! use ledgerwire_testkit::fixtures;
//!
//! let (kind, values) = fixtures::payment(7, 100);
//! let bytes = ledgerwire_core::encode(kind, &values).unwrap();
//! assert!(!bytes.is_empty());
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{account_root, ledger_hashes, payment, payment_with_memo, TestAccounts};
pub use generators::{any_transaction, payment as payment_strategy};
