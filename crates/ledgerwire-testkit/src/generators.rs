//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;

use ledgerwire_core::{
    AccountId, Amount, FieldId, FieldValues, Hash128, Hash256, Kind, LedgerEntryKind,
    TransactionKind, Value, MAX_DROPS,
};

/// Generate a random AccountId.
pub fn account_id() -> impl Strategy<Value = AccountId> {
    any::<[u8; 20]>().prop_map(AccountId::from_bytes)
}

/// Generate a random Hash256.
pub fn hash256() -> impl Strategy<Value = Hash256> {
    any::<[u8; 32]>().prop_map(Hash256::from_bytes)
}

/// Generate a random Hash128.
pub fn hash128() -> impl Strategy<Value = Hash128> {
    any::<[u8; 16]>().prop_map(Hash128::from_bytes)
}

/// Generate a valid amount.
pub fn amount() -> impl Strategy<Value = Amount> {
    (0..=MAX_DROPS).prop_map(|drops| {
        Amount::from_drops(drops).expect("generated drops are within bounds")
    })
}

/// Generate blob bytes up to the given length.
pub fn blob(max_len: usize) -> impl Strategy<Value = Bytes> {
    prop::collection::vec(any::<u8>(), 0..=max_len).prop_map(Bytes::from)
}

/// Generate any transaction kind.
pub fn transaction_kind() -> impl Strategy<Value = TransactionKind> {
    prop::sample::select(TransactionKind::ALL)
}

/// Generate any ledger-entry kind.
pub fn ledger_entry_kind() -> impl Strategy<Value = LedgerEntryKind> {
    prop::sample::select(LedgerEntryKind::ALL)
}

/// Generate a memo object: MemoType plus optional MemoData/MemoFormat.
pub fn memo() -> impl Strategy<Value = FieldValues> {
    (blob(16), prop::option::of(blob(64)), prop::option::of(blob(8))).prop_map(
        |(memo_type, memo_data, memo_format)| {
            let mut values = FieldValues::new();
            values.insert(FieldId::MemoType, Value::Blob(memo_type));
            if let Some(data) = memo_data {
                values.insert(FieldId::MemoData, Value::Blob(data));
            }
            if let Some(format) = memo_format {
                values.insert(FieldId::MemoFormat, Value::Blob(format));
            }
            values
        },
    )
}

/// Generate a Memos array value.
pub fn memos() -> impl Strategy<Value = Value> {
    prop::collection::vec(memo(), 1..4)
        .prop_map(|items| Value::Array(items.into_iter().map(|m| (FieldId::Memo, m)).collect()))
}

/// The transaction envelope every kind shares.
fn envelope(kind: TransactionKind) -> impl Strategy<Value = FieldValues> {
    (
        account_id(),
        any::<u32>(),
        amount(),
        prop::option::of(any::<u32>()),
        prop::option::of(1u32..),
        prop::option::of(memos()),
    )
        .prop_map(move |(account, sequence, fee, source_tag, flags, memos)| {
            let mut values = FieldValues::new();
            values.insert(FieldId::TransactionType, Value::UInt16(kind.discriminant()));
            values.insert(FieldId::Account, Value::AccountId(account));
            values.insert(FieldId::Sequence, Value::UInt32(sequence));
            values.insert(FieldId::Fee, Value::Amount(fee));
            if let Some(tag) = source_tag {
                values.insert(FieldId::SourceTag, Value::UInt32(tag));
            }
            if let Some(flags) = flags {
                values.insert(FieldId::Flags, Value::UInt32(flags));
            }
            if let Some(memos) = memos {
                values.insert(FieldId::Memos, memos);
            }
            values
        })
}

/// Generate a complete, format-satisfying Payment.
pub fn payment() -> impl Strategy<Value = FieldValues> {
    (
        envelope(TransactionKind::Payment),
        amount(),
        account_id(),
        prop::option::of(any::<u32>()),
        prop::option::of(hash256()),
    )
        .prop_map(|(mut values, amount, destination, tag, invoice)| {
            values.insert(FieldId::Amount, Value::Amount(amount));
            values.insert(FieldId::Destination, Value::AccountId(destination));
            if let Some(tag) = tag {
                values.insert(FieldId::DestinationTag, Value::UInt32(tag));
            }
            if let Some(invoice) = invoice {
                values.insert(FieldId::InvoiceID, Value::Hash256(invoice));
            }
            values
        })
}

/// Generate a complete transaction of any kind, with its format satisfied.
pub fn any_transaction() -> impl Strategy<Value = (Kind, FieldValues)> {
    transaction_kind().prop_flat_map(|kind| {
        let extras = match kind {
            TransactionKind::Payment => (
                envelope(kind),
                amount(),
                account_id(),
                Just(kind),
            )
                .prop_map(|(mut values, amount, destination, kind)| {
                    values.insert(FieldId::Amount, Value::Amount(amount));
                    values.insert(FieldId::Destination, Value::AccountId(destination));
                    (kind, values)
                })
                .boxed(),
            TransactionKind::AccountSet => (envelope(kind), prop::option::of(blob(32)), Just(kind))
                .prop_map(|(mut values, domain, kind)| {
                    if let Some(domain) = domain {
                        values.insert(FieldId::Domain, Value::Blob(domain));
                    }
                    (kind, values)
                })
                .boxed(),
            TransactionKind::SetRegularKey => {
                (envelope(kind), prop::option::of(account_id()), Just(kind))
                    .prop_map(|(mut values, key, kind)| {
                        if let Some(key) = key {
                            values.insert(FieldId::RegularKey, Value::AccountId(key));
                        }
                        (kind, values)
                    })
                    .boxed()
            }
            TransactionKind::OfferCreate => (envelope(kind), amount(), amount(), Just(kind))
                .prop_map(|(mut values, pays, gets, kind)| {
                    values.insert(FieldId::TakerPays, Value::Amount(pays));
                    values.insert(FieldId::TakerGets, Value::Amount(gets));
                    (kind, values)
                })
                .boxed(),
            TransactionKind::OfferCancel => (envelope(kind), any::<u32>(), Just(kind))
                .prop_map(|(mut values, seq, kind)| {
                    values.insert(FieldId::OfferSequence, Value::UInt32(seq));
                    (kind, values)
                })
                .boxed(),
            TransactionKind::TrustSet => (envelope(kind), amount(), Just(kind))
                .prop_map(|(mut values, limit, kind)| {
                    values.insert(FieldId::LimitAmount, Value::Amount(limit));
                    (kind, values)
                })
                .boxed(),
        };
        extras.prop_map(|(kind, values)| (Kind::Transaction(kind), values))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_payments_satisfy_the_format(values in payment()) {
            let format = Kind::Transaction(TransactionKind::Payment).format();
            for (field, _) in values.iter() {
                prop_assert!(format.requirement_of(field).is_ok());
            }
        }

        #[test]
        fn generated_transactions_encode(pair in any_transaction()) {
            let (kind, values) = pair;
            prop_assert!(ledgerwire_core::encode(kind, &values).is_ok());
        }
    }
}
