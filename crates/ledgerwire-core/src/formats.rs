//! Per-kind formats: which fields a kind must, may, or must not carry.
//!
//! Kinds form two closed enumerations, transactions and ledger entries,
//! each mapped 1:1 to a [`Format`]. A field absent from a kind's format is
//! illegal for that kind; the codec reports it as `FieldNotAllowed` rather
//! than defaulting silently.

use std::sync::OnceLock;

use crate::error::CodecError;
use crate::fields::FieldId;
use crate::value::Value;

/// How a field participates in a kind's format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requirement {
    Required,
    Optional,
    /// Carries a format-declared default; omitted on encode when equal to it.
    Default,
}

impl Requirement {
    /// The requirement string used by the protocol description.
    pub fn as_str(self) -> &'static str {
        match self {
            Requirement::Required => "REQUIRED",
            Requirement::Optional => "OPTIONAL",
            Requirement::Default => "DEFAULT",
        }
    }

    /// Parse a requirement string from the protocol description.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "REQUIRED" => Some(Requirement::Required),
            "OPTIONAL" => Some(Requirement::Optional),
            "DEFAULT" => Some(Requirement::Default),
            _ => None,
        }
    }
}

/// The schema of one kind: its legal fields, their requirements, and the
/// defaults for `Requirement::Default` fields.
pub struct Format {
    name: &'static str,
    requirements: Vec<(FieldId, Requirement)>,
    defaults: Vec<(FieldId, Value)>,
}

impl Format {
    fn new(
        name: &'static str,
        requirements: Vec<(FieldId, Requirement)>,
        defaults: Vec<(FieldId, Value)>,
    ) -> Self {
        for (i, (field, req)) in requirements.iter().enumerate() {
            assert!(
                field.is_serialized() && !field.is_end_marker(),
                "{name} format names non-wire field {}",
                field.name()
            );
            assert!(
                !requirements[..i].iter().any(|(f, _)| f == field),
                "{name} format repeats field {}",
                field.name()
            );
            if *req == Requirement::Default {
                assert!(
                    defaults.iter().any(|(f, _)| f == field),
                    "{name} format declares {} DEFAULT without a default value",
                    field.name()
                );
            }
        }
        for (field, value) in &defaults {
            assert_eq!(
                value.type_id(),
                field.type_id(),
                "{name} format default for {} has the wrong type",
                field.name()
            );
        }
        Self {
            name,
            requirements,
            defaults,
        }
    }

    /// The kind name this format belongs to.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The requirement for a field, or `FieldNotAllowed` if the field is
    /// not part of this kind's schema. This is the primary validation
    /// signal; it is never a silent default.
    pub fn requirement_of(&self, field: FieldId) -> Result<Requirement, CodecError> {
        self.requirements
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, r)| *r)
            .ok_or(CodecError::FieldNotAllowed {
                kind: self.name,
                field: field.name(),
            })
    }

    /// The format-declared default for a `Requirement::Default` field.
    pub fn default_of(&self, field: FieldId) -> Option<&Value> {
        self.defaults.iter().find(|(f, _)| *f == field).map(|(_, v)| v)
    }

    /// All (field, requirement) pairs in declaration order.
    pub fn requirements(&self) -> impl Iterator<Item = (FieldId, Requirement)> + '_ {
        self.requirements.iter().copied()
    }

    /// Number of fields in this format.
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether the format is empty (never true for real kinds).
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// All fields of this format sorted by (type_id, field_code) ascending.
    /// This is the exact wire order, independent of declaration order.
    pub fn canonical_field_order(&self) -> Vec<FieldId> {
        let mut fields: Vec<FieldId> = self.requirements.iter().map(|(f, _)| *f).collect();
        fields.sort_by_key(|f| f.sort_key());
        fields
    }
}

macro_rules! define_kinds {
    ($enum_name:ident, $all_doc:literal, $($variant:ident = $disc:literal,)*) => {
        #[doc = $all_doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum $enum_name {
            $($variant = $disc,)*
        }

        impl $enum_name {
            /// All kinds, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$($enum_name::$variant,)*];

            /// The kind's name, as used by the protocol description.
            pub fn name(self) -> &'static str {
                match self {
                    $($enum_name::$variant => stringify!($variant),)*
                }
            }

            /// The wire discriminant carried in the kind's type field.
            pub fn discriminant(self) -> u16 {
                self as u16
            }

            /// Resolve a wire discriminant.
            pub fn from_discriminant(value: u16) -> Option<Self> {
                match value {
                    $($disc => Some($enum_name::$variant),)*
                    _ => None,
                }
            }

            /// Resolve a kind by name.
            pub fn from_name(name: &str) -> Result<Self, CodecError> {
                match name {
                    $(stringify!($variant) => Ok($enum_name::$variant),)*
                    _ => Err(CodecError::UnknownKind(name.to_string())),
                }
            }
        }
    };
}

define_kinds! {
    TransactionKind,
    "The closed set of transaction kinds.",
    Payment = 0,
    AccountSet = 3,
    SetRegularKey = 5,
    OfferCreate = 7,
    OfferCancel = 8,
    TrustSet = 20,
}

define_kinds! {
    LedgerEntryKind,
    "The closed set of ledger-entry kinds.",
    AccountRoot = 97,
    DirectoryNode = 100,
    LedgerHashes = 104,
    Offer = 111,
    RippleState = 114,
}

/// Any serializable object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Transaction(TransactionKind),
    LedgerEntry(LedgerEntryKind),
}

impl Kind {
    /// The kind's name.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Transaction(k) => k.name(),
            Kind::LedgerEntry(k) => k.name(),
        }
    }

    /// The field carrying this kind's wire discriminant.
    pub fn discriminant_field(self) -> FieldId {
        match self {
            Kind::Transaction(_) => FieldId::TransactionType,
            Kind::LedgerEntry(_) => FieldId::LedgerEntryType,
        }
    }

    /// The kind's wire discriminant.
    pub fn discriminant(self) -> u16 {
        match self {
            Kind::Transaction(k) => k.discriminant(),
            Kind::LedgerEntry(k) => k.discriminant(),
        }
    }

    /// This kind's format.
    pub fn format(self) -> &'static Format {
        format_of(self)
    }

    /// Resolve a kind by name, searching both closed enumerations.
    pub fn from_name(name: &str) -> Result<Self, CodecError> {
        TransactionKind::from_name(name)
            .map(Kind::Transaction)
            .or_else(|_| LedgerEntryKind::from_name(name).map(Kind::LedgerEntry))
    }
}

fn tx_common() -> Vec<(FieldId, Requirement)> {
    use Requirement::*;
    vec![
        (FieldId::TransactionType, Required),
        (FieldId::Account, Required),
        (FieldId::Sequence, Required),
        (FieldId::Fee, Required),
        (FieldId::Flags, Default),
        (FieldId::SourceTag, Optional),
        (FieldId::LastLedgerSequence, Optional),
        (FieldId::Memos, Optional),
        (FieldId::SigningPubKey, Optional),
        (FieldId::TxnSignature, Optional),
    ]
}

fn le_common() -> Vec<(FieldId, Requirement)> {
    use Requirement::*;
    vec![
        (FieldId::LedgerEntryType, Required),
        (FieldId::Flags, Default),
    ]
}

fn flags_default() -> Vec<(FieldId, Value)> {
    vec![(FieldId::Flags, Value::UInt32(0))]
}

fn tx_format(kind: TransactionKind, extra: Vec<(FieldId, Requirement)>) -> Format {
    let mut requirements = tx_common();
    requirements.extend(extra);
    Format::new(kind.name(), requirements, flags_default())
}

fn le_format(kind: LedgerEntryKind, extra: Vec<(FieldId, Requirement)>) -> Format {
    let mut requirements = le_common();
    requirements.extend(extra);
    Format::new(kind.name(), requirements, flags_default())
}

fn build_tx_formats() -> Vec<Format> {
    use Requirement::*;
    TransactionKind::ALL
        .iter()
        .map(|&kind| {
            let extra = match kind {
                TransactionKind::Payment => vec![
                    (FieldId::Amount, Required),
                    (FieldId::Destination, Required),
                    (FieldId::DestinationTag, Optional),
                    (FieldId::InvoiceID, Optional),
                    (FieldId::SendMax, Optional),
                ],
                TransactionKind::AccountSet => vec![
                    (FieldId::EmailHash, Optional),
                    (FieldId::WalletLocator, Optional),
                    (FieldId::MessageKey, Optional),
                    (FieldId::Domain, Optional),
                    (FieldId::TransferRate, Optional),
                    (FieldId::TickSize, Optional),
                ],
                TransactionKind::SetRegularKey => vec![(FieldId::RegularKey, Optional)],
                TransactionKind::OfferCreate => vec![
                    (FieldId::TakerPays, Required),
                    (FieldId::TakerGets, Required),
                    (FieldId::Expiration, Optional),
                    (FieldId::OfferSequence, Optional),
                ],
                TransactionKind::OfferCancel => vec![(FieldId::OfferSequence, Required)],
                TransactionKind::TrustSet => vec![
                    (FieldId::LimitAmount, Required),
                    (FieldId::QualityIn, Optional),
                    (FieldId::QualityOut, Optional),
                ],
            };
            tx_format(kind, extra)
        })
        .collect()
}

fn build_le_formats() -> Vec<Format> {
    use Requirement::*;
    LedgerEntryKind::ALL
        .iter()
        .map(|&kind| {
            let extra = match kind {
                LedgerEntryKind::AccountRoot => vec![
                    (FieldId::Account, Required),
                    (FieldId::Sequence, Required),
                    (FieldId::Balance, Required),
                    (FieldId::OwnerCount, Required),
                    (FieldId::PreviousTxnID, Required),
                    (FieldId::PreviousTxnLgrSeq, Required),
                    (FieldId::RegularKey, Optional),
                    (FieldId::EmailHash, Optional),
                    (FieldId::WalletLocator, Optional),
                    (FieldId::MessageKey, Optional),
                    (FieldId::Domain, Optional),
                    (FieldId::TransferRate, Optional),
                    (FieldId::TickSize, Optional),
                ],
                LedgerEntryKind::DirectoryNode => vec![
                    (FieldId::RootIndex, Required),
                    (FieldId::Indexes, Required),
                    (FieldId::IndexNext, Optional),
                    (FieldId::IndexPrevious, Optional),
                    (FieldId::Owner, Optional),
                    (FieldId::ExchangeRate, Optional),
                    (FieldId::TakerPaysCurrency, Optional),
                    (FieldId::TakerPaysIssuer, Optional),
                    (FieldId::TakerGetsCurrency, Optional),
                    (FieldId::TakerGetsIssuer, Optional),
                ],
                LedgerEntryKind::LedgerHashes => vec![
                    (FieldId::Hashes, Required),
                    (FieldId::LastLedgerSequence, Optional),
                ],
                LedgerEntryKind::Offer => vec![
                    (FieldId::Account, Required),
                    (FieldId::Sequence, Required),
                    (FieldId::TakerPays, Required),
                    (FieldId::TakerGets, Required),
                    (FieldId::BookDirectory, Required),
                    (FieldId::BookNode, Required),
                    (FieldId::OwnerNode, Required),
                    (FieldId::PreviousTxnID, Required),
                    (FieldId::PreviousTxnLgrSeq, Required),
                    (FieldId::Expiration, Optional),
                ],
                LedgerEntryKind::RippleState => vec![
                    (FieldId::Balance, Required),
                    (FieldId::LowLimit, Required),
                    (FieldId::HighLimit, Required),
                    (FieldId::LowNode, Optional),
                    (FieldId::HighNode, Optional),
                    (FieldId::PreviousTxnID, Required),
                    (FieldId::PreviousTxnLgrSeq, Required),
                ],
            };
            le_format(kind, extra)
        })
        .collect()
}

fn tx_formats() -> &'static [Format] {
    static FORMATS: OnceLock<Vec<Format>> = OnceLock::new();
    FORMATS.get_or_init(build_tx_formats)
}

fn le_formats() -> &'static [Format] {
    static FORMATS: OnceLock<Vec<Format>> = OnceLock::new();
    FORMATS.get_or_init(build_le_formats)
}

/// The format for a kind. Infallible for enum members; name-based lookup
/// goes through [`format_by_name`].
pub fn format_of(kind: Kind) -> &'static Format {
    // The format tables are built by iterating ALL, so every member has an
    // entry at its declaration index.
    match kind {
        Kind::Transaction(k) => tx_formats()
            .iter()
            .find(|f| f.name() == k.name())
            .expect("transaction format table covers all kinds"),
        Kind::LedgerEntry(k) => le_formats()
            .iter()
            .find(|f| f.name() == k.name())
            .expect("ledger-entry format table covers all kinds"),
    }
}

/// Resolve a format by kind name, failing with `UnknownKind`.
pub fn format_by_name(name: &str) -> Result<&'static Format, CodecError> {
    Kind::from_name(name).map(format_of)
}
