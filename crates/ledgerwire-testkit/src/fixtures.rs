//! Deterministic fixtures for integration tests and golden vectors.

use bytes::Bytes;

use ledgerwire_core::{
    AccountId, Amount, FieldId, FieldValues, Hash256, Kind, LedgerEntryKind, TransactionKind,
    Value,
};

/// A pair of fixed test accounts.
pub struct TestAccounts {
    pub source: AccountId,
    pub destination: AccountId,
}

impl Default for TestAccounts {
    fn default() -> Self {
        Self {
            source: AccountId::from_bytes([0x11; 20]),
            destination: AccountId::from_bytes([0x22; 20]),
        }
    }
}

/// An amount that is known valid; for fixture construction only.
pub fn drops(value: u64) -> Amount {
    Amount::from_drops(value).expect("fixture amounts are within bounds")
}

/// A minimal, fully required-satisfying Payment.
pub fn payment(sequence: u32, amount_drops: u64) -> (Kind, FieldValues) {
    let accounts = TestAccounts::default();
    let mut values = FieldValues::new();
    values.insert(
        FieldId::TransactionType,
        Value::UInt16(TransactionKind::Payment.discriminant()),
    );
    values.insert(FieldId::Account, Value::AccountId(accounts.source));
    values.insert(FieldId::Sequence, Value::UInt32(sequence));
    values.insert(FieldId::Fee, Value::Amount(drops(10)));
    values.insert(FieldId::Amount, Value::Amount(drops(amount_drops)));
    values.insert(
        FieldId::Destination,
        Value::AccountId(accounts.destination),
    );
    (Kind::Transaction(TransactionKind::Payment), values)
}

/// A Payment carrying one memo.
pub fn payment_with_memo(sequence: u32, memo_type: &'static [u8], memo_data: &'static [u8]) -> (Kind, FieldValues) {
    let (kind, mut values) = payment(sequence, 100);
    let mut memo = FieldValues::new();
    memo.insert(FieldId::MemoType, Value::Blob(Bytes::from_static(memo_type)));
    memo.insert(FieldId::MemoData, Value::Blob(Bytes::from_static(memo_data)));
    values.insert(FieldId::Memos, Value::Array(vec![(FieldId::Memo, memo)]));
    (kind, values)
}

/// A minimal AccountRoot ledger entry.
pub fn account_root(sequence: u32, balance_drops: u64) -> (Kind, FieldValues) {
    let accounts = TestAccounts::default();
    let mut values = FieldValues::new();
    values.insert(
        FieldId::LedgerEntryType,
        Value::UInt16(LedgerEntryKind::AccountRoot.discriminant()),
    );
    values.insert(FieldId::Account, Value::AccountId(accounts.source));
    values.insert(FieldId::Sequence, Value::UInt32(sequence));
    values.insert(FieldId::Balance, Value::Amount(drops(balance_drops)));
    values.insert(FieldId::OwnerCount, Value::UInt32(0));
    values.insert(
        FieldId::PreviousTxnID,
        Value::Hash256(Hash256::from_bytes([0xab; 32])),
    );
    values.insert(FieldId::PreviousTxnLgrSeq, Value::UInt32(1));
    (Kind::LedgerEntry(LedgerEntryKind::AccountRoot), values)
}

/// A LedgerHashes entry with two fixed hashes.
pub fn ledger_hashes() -> (Kind, FieldValues) {
    let mut values = FieldValues::new();
    values.insert(
        FieldId::LedgerEntryType,
        Value::UInt16(LedgerEntryKind::LedgerHashes.discriminant()),
    );
    values.insert(
        FieldId::Hashes,
        Value::Vector256(vec![
            Hash256::from_bytes([0xaa; 32]),
            Hash256::from_bytes([0xbb; 32]),
        ]),
    );
    values.insert(FieldId::LastLedgerSequence, Value::UInt32(9));
    (Kind::LedgerEntry(LedgerEntryKind::LedgerHashes), values)
}
