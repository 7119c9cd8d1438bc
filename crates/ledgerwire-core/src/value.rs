//! Typed values and the canonical field/value map.

use std::collections::BTreeMap;

use bytes::Bytes;

use crate::fields::FieldId;
use crate::types::{AccountId, Amount, Hash128, Hash160, Hash256, TypeId};

/// A typed value carried by a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Hash128(Hash128),
    Hash160(Hash160),
    Hash256(Hash256),
    Amount(Amount),
    Blob(Bytes),
    AccountId(AccountId),
    /// A nested object: an inner field/value map, closed on the wire by
    /// the ObjectEndMarker tag.
    Object(FieldValues),
    /// An array of wrapped objects. Each item is a single object-typed
    /// field (for example `Memo`) carrying its inner field/value map.
    Array(Vec<(FieldId, FieldValues)>),
    Vector256(Vec<Hash256>),
}

impl Value {
    /// The wire type of this value.
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::UInt8(_) => TypeId::UInt8,
            Value::UInt16(_) => TypeId::UInt16,
            Value::UInt32(_) => TypeId::UInt32,
            Value::UInt64(_) => TypeId::UInt64,
            Value::Hash128(_) => TypeId::Hash128,
            Value::Hash160(_) => TypeId::Hash160,
            Value::Hash256(_) => TypeId::Hash256,
            Value::Amount(_) => TypeId::Amount,
            Value::Blob(_) => TypeId::Blob,
            Value::AccountId(_) => TypeId::AccountId,
            Value::Object(_) => TypeId::Object,
            Value::Array(_) => TypeId::Array,
            Value::Vector256(_) => TypeId::Vector256,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Value::UInt16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_amount(&self) -> Option<Amount> {
        match self {
            Value::Amount(a) => Some(*a),
            _ => None,
        }
    }

    pub fn as_account_id(&self) -> Option<AccountId> {
        match self {
            Value::AccountId(a) => Some(*a),
            _ => None,
        }
    }
}

impl From<Amount> for Value {
    fn from(a: Amount) -> Self {
        Value::Amount(a)
    }
}

impl From<AccountId> for Value {
    fn from(a: AccountId) -> Self {
        Value::AccountId(a)
    }
}

impl From<Hash256> for Value {
    fn from(h: Hash256) -> Self {
        Value::Hash256(h)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::UInt32(v)
    }
}

/// An unordered field/value map with canonical iteration order.
///
/// Entries are keyed by the field's (type_id, field_code) coordinate, so
/// iteration always yields canonical wire order regardless of insertion
/// order. Two maps built from the same entries in different orders compare
/// equal and encode to identical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldValues {
    entries: BTreeMap<(u16, u16), (FieldId, Value)>,
}

impl FieldValues {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any previous value for the field.
    pub fn insert(&mut self, field: FieldId, value: Value) -> Option<Value> {
        self.entries
            .insert(field.sort_key(), (field, value))
            .map(|(_, v)| v)
    }

    /// Get the value for a field, if present.
    pub fn get(&self, field: FieldId) -> Option<&Value> {
        self.entries.get(&field.sort_key()).map(|(_, v)| v)
    }

    /// Whether the field is present.
    pub fn contains(&self, field: FieldId) -> bool {
        self.entries.contains_key(&field.sort_key())
    }

    /// Remove a field's value.
    pub fn remove(&mut self, field: FieldId) -> Option<Value> {
        self.entries.remove(&field.sort_key()).map(|(_, v)| v)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in canonical (type_id, field_code) order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &Value)> {
        self.entries.values().map(|(f, v)| (*f, v))
    }
}

impl FromIterator<(FieldId, Value)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (FieldId, Value)>>(iter: I) -> Self {
        let mut values = FieldValues::new();
        for (field, value) in iter {
            values.insert(field, value);
        }
        values
    }
}
