//! The field dictionary: every named field with its owning type and code.
//!
//! Fields are a closed enumeration. The (type_id, field_code) coordinate of
//! a field is unique and stable; it determines both the wire tag and the
//! canonical ordering. The two end markers are serialized as implicit
//! terminators and are intentionally absent from the protocol description.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::CodecError;
use crate::types::TypeId;

macro_rules! define_fields {
    ($($variant:ident => ($name:literal, $ty:ident, $code:literal, $serialized:literal),)*) => {
        /// A named, typed, numerically coded field.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum FieldId {
            $($variant,)*
        }

        impl FieldId {
            /// All fields, in declaration order (not canonical order).
            pub const ALL: &'static [FieldId] = &[$(FieldId::$variant,)*];

            /// The field's name, as used by the protocol description.
            pub fn name(self) -> &'static str {
                match self {
                    $(FieldId::$variant => $name,)*
                }
            }

            /// The owning wire type.
            pub fn type_id(self) -> TypeId {
                match self {
                    $(FieldId::$variant => TypeId::$ty,)*
                }
            }

            /// The field code within the owning type. Always positive.
            pub fn code(self) -> u16 {
                match self {
                    $(FieldId::$variant => $code,)*
                }
            }

            /// Whether this field appears on the wire at all.
            pub fn is_serialized(self) -> bool {
                match self {
                    $(FieldId::$variant => $serialized,)*
                }
            }
        }
    };
}

define_fields! {
    // UInt16
    LedgerEntryType => ("LedgerEntryType", UInt16, 1, true),
    TransactionType => ("TransactionType", UInt16, 2, true),

    // UInt32
    Flags => ("Flags", UInt32, 2, true),
    SourceTag => ("SourceTag", UInt32, 3, true),
    Sequence => ("Sequence", UInt32, 4, true),
    PreviousTxnLgrSeq => ("PreviousTxnLgrSeq", UInt32, 5, true),
    LedgerSequence => ("LedgerSequence", UInt32, 6, true),
    Expiration => ("Expiration", UInt32, 10, true),
    TransferRate => ("TransferRate", UInt32, 11, true),
    OwnerCount => ("OwnerCount", UInt32, 13, true),
    DestinationTag => ("DestinationTag", UInt32, 14, true),
    QualityIn => ("QualityIn", UInt32, 20, true),
    QualityOut => ("QualityOut", UInt32, 21, true),
    OfferSequence => ("OfferSequence", UInt32, 25, true),
    LastLedgerSequence => ("LastLedgerSequence", UInt32, 27, true),

    // UInt64
    IndexNext => ("IndexNext", UInt64, 1, true),
    IndexPrevious => ("IndexPrevious", UInt64, 2, true),
    BookNode => ("BookNode", UInt64, 3, true),
    OwnerNode => ("OwnerNode", UInt64, 4, true),
    ExchangeRate => ("ExchangeRate", UInt64, 6, true),
    LowNode => ("LowNode", UInt64, 7, true),
    HighNode => ("HighNode", UInt64, 8, true),

    // Hash128
    EmailHash => ("EmailHash", Hash128, 1, true),

    // Hash256
    LedgerHash => ("LedgerHash", Hash256, 1, true),
    ParentHash => ("ParentHash", Hash256, 2, true),
    TransactionHash => ("TransactionHash", Hash256, 3, true),
    AccountHash => ("AccountHash", Hash256, 4, true),
    PreviousTxnID => ("PreviousTxnID", Hash256, 5, true),
    WalletLocator => ("WalletLocator", Hash256, 7, true),
    RootIndex => ("RootIndex", Hash256, 8, true),
    BookDirectory => ("BookDirectory", Hash256, 16, true),
    InvoiceID => ("InvoiceID", Hash256, 17, true),
    // Ledger-local coordinates, never serialized.
    Hash => ("hash", Hash256, 257, false),
    Index => ("index", Hash256, 258, false),

    // Amount
    Amount => ("Amount", Amount, 1, true),
    Balance => ("Balance", Amount, 2, true),
    LimitAmount => ("LimitAmount", Amount, 3, true),
    TakerPays => ("TakerPays", Amount, 4, true),
    TakerGets => ("TakerGets", Amount, 5, true),
    LowLimit => ("LowLimit", Amount, 6, true),
    HighLimit => ("HighLimit", Amount, 7, true),
    Fee => ("Fee", Amount, 8, true),
    SendMax => ("SendMax", Amount, 9, true),

    // Blob
    PublicKey => ("PublicKey", Blob, 1, true),
    MessageKey => ("MessageKey", Blob, 2, true),
    SigningPubKey => ("SigningPubKey", Blob, 3, true),
    TxnSignature => ("TxnSignature", Blob, 4, true),
    Signature => ("Signature", Blob, 6, true),
    Domain => ("Domain", Blob, 7, true),
    MemoType => ("MemoType", Blob, 12, true),
    MemoData => ("MemoData", Blob, 13, true),
    MemoFormat => ("MemoFormat", Blob, 14, true),

    // AccountID
    Account => ("Account", AccountId, 1, true),
    Owner => ("Owner", AccountId, 2, true),
    Destination => ("Destination", AccountId, 3, true),
    Issuer => ("Issuer", AccountId, 4, true),
    RegularKey => ("RegularKey", AccountId, 8, true),

    // Object
    ObjectEndMarker => ("ObjectEndMarker", Object, 1, true),
    Memo => ("Memo", Object, 10, true),

    // Array
    ArrayEndMarker => ("ArrayEndMarker", Array, 1, true),
    Memos => ("Memos", Array, 9, true),

    // UInt8
    CloseResolution => ("CloseResolution", UInt8, 1, true),
    TickSize => ("TickSize", UInt8, 16, true),

    // Hash160
    TakerPaysCurrency => ("TakerPaysCurrency", Hash160, 1, true),
    TakerPaysIssuer => ("TakerPaysIssuer", Hash160, 2, true),
    TakerGetsCurrency => ("TakerGetsCurrency", Hash160, 3, true),
    TakerGetsIssuer => ("TakerGetsIssuer", Hash160, 4, true),

    // Vector256
    Indexes => ("Indexes", Vector256, 1, true),
    Hashes => ("Hashes", Vector256, 2, true),
}

impl FieldId {
    /// The canonical sort key: (type_id, field_code) ascending.
    pub fn sort_key(self) -> (u16, u16) {
        (self.type_id().id(), self.code())
    }

    /// Whether this field is one of the two implicit terminators.
    pub fn is_end_marker(self) -> bool {
        matches!(self, FieldId::ObjectEndMarker | FieldId::ArrayEndMarker)
    }
}

/// Process-wide immutable lookup tables over the field enumeration.
///
/// Built once on first use and shared by reference; concurrent readers
/// need no locking.
pub struct Dictionary {
    by_name: HashMap<&'static str, FieldId>,
    by_code: HashMap<(u16, u16), FieldId>,
}

impl Dictionary {
    /// The shared dictionary instance.
    pub fn global() -> &'static Dictionary {
        static DICTIONARY: OnceLock<Dictionary> = OnceLock::new();
        DICTIONARY.get_or_init(Dictionary::build)
    }

    fn build() -> Self {
        let mut by_name = HashMap::with_capacity(FieldId::ALL.len());
        let mut by_code = HashMap::with_capacity(FieldId::ALL.len());
        for &field in FieldId::ALL {
            assert!(field.code() > 0, "field {} has a zero code", field.name());
            if by_name.insert(field.name(), field).is_some() {
                panic!("duplicate field name: {}", field.name());
            }
            if let Some(other) = by_code.insert(field.sort_key(), field) {
                panic!(
                    "field coordinate collision: {} and {} both at ({}, {})",
                    field.name(),
                    other.name(),
                    field.type_id().id(),
                    field.code()
                );
            }
        }
        Self { by_name, by_code }
    }

    /// Look up a field by name.
    pub fn field_of(&self, name: &str) -> Result<FieldId, CodecError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CodecError::UnknownField(name.to_string()))
    }

    /// Look up a field by its (type, code) coordinate.
    pub fn field_at(&self, type_id: TypeId, code: u16) -> Result<FieldId, CodecError> {
        self.by_code
            .get(&(type_id.id(), code))
            .copied()
            .ok_or(CodecError::UnknownFieldCode {
                type_id: type_id.id(),
                code,
            })
    }

    /// All fields, in declaration order.
    pub fn all(&self) -> impl Iterator<Item = FieldId> + '_ {
        FieldId::ALL.iter().copied()
    }
}
