//! The type registry: primitive wire types and their value newtypes.
//!
//! Every serializable field owns exactly one [`TypeId`]. The numeric ids
//! drive canonical field ordering and the wire tags, so they are part of
//! the consensus protocol and must never be renumbered.

use std::fmt;

use crate::error::CodecError;

/// A primitive wire type with a stable numeric identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TypeId {
    UInt16 = 1,
    UInt32 = 2,
    UInt64 = 3,
    Hash128 = 4,
    Hash256 = 5,
    Amount = 6,
    Blob = 7,
    AccountId = 8,
    Object = 14,
    Array = 15,
    UInt8 = 16,
    Hash160 = 17,
    Vector256 = 19,
}

impl TypeId {
    /// All registered types, in id order.
    pub const ALL: &'static [TypeId] = &[
        TypeId::UInt16,
        TypeId::UInt32,
        TypeId::UInt64,
        TypeId::Hash128,
        TypeId::Hash256,
        TypeId::Amount,
        TypeId::Blob,
        TypeId::AccountId,
        TypeId::Object,
        TypeId::Array,
        TypeId::UInt8,
        TypeId::Hash160,
        TypeId::Vector256,
    ];

    /// The stable numeric identifier of this type.
    pub fn id(self) -> u16 {
        self as u16
    }

    /// The canonical name of this type, as used by the protocol description.
    pub fn name(self) -> &'static str {
        match self {
            TypeId::UInt16 => "UInt16",
            TypeId::UInt32 => "UInt32",
            TypeId::UInt64 => "UInt64",
            TypeId::Hash128 => "Hash128",
            TypeId::Hash256 => "Hash256",
            TypeId::Amount => "Amount",
            TypeId::Blob => "Blob",
            TypeId::AccountId => "AccountID",
            TypeId::Object => "Object",
            TypeId::Array => "Array",
            TypeId::UInt8 => "UInt8",
            TypeId::Hash160 => "Hash160",
            TypeId::Vector256 => "Vector256",
        }
    }

    /// Look up a type by its canonical name.
    pub fn from_name(name: &str) -> Result<Self, CodecError> {
        TypeId::ALL
            .iter()
            .copied()
            .find(|t| t.name() == name)
            .ok_or_else(|| CodecError::UnknownType(name.to_string()))
    }

    /// Look up a type by its numeric identifier.
    pub fn from_id(id: u16) -> Option<Self> {
        TypeId::ALL.iter().copied().find(|t| t.id() == id)
    }

    /// Whether values of this type carry a variable-length prefix on the wire.
    pub fn is_vl_encoded(self) -> bool {
        matches!(self, TypeId::Blob | TypeId::AccountId | TypeId::Vector256)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! fixed_hash {
    ($(#[$doc:meta])* $name:ident, $len:expr) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;

            /// Create from raw bytes.
            pub const fn from_bytes(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Get the raw bytes.
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Convert to hex string.
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// Parse from hex string.
            pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
                let bytes = hex::decode(s)?;
                if bytes.len() != $len {
                    return Err(hex::FromHexError::InvalidStringLength);
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }

            /// The all-zero value (used as a sentinel in tests and defaults).
            pub const ZERO: Self = Self([0u8; $len]);
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), &self.to_hex()[..16])
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }
    };
}

fixed_hash!(
    /// A 128-bit hash value.
    Hash128,
    16
);
fixed_hash!(
    /// A 160-bit hash value (currency and issuer coordinates).
    Hash160,
    20
);
fixed_hash!(
    /// A 256-bit hash value (ledger indexes, transaction ids).
    Hash256,
    32
);

/// A 20-byte account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    pub const LEN: usize = 20;

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 20 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for AccountId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// The largest representable amount, in drops.
pub const MAX_DROPS: u64 = 100_000_000_000_000_000;

/// Wire marker for a native amount (bit 62). Bit 63 is reserved for
/// issued assets, which this protocol does not carry.
pub(crate) const AMOUNT_NATIVE_BIT: u64 = 0x4000_0000_0000_0000;
pub(crate) const AMOUNT_ISSUED_BIT: u64 = 0x8000_0000_0000_0000;

/// A native currency amount, counted in drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Amount {
    drops: u64,
}

impl Amount {
    /// Zero drops.
    pub const ZERO: Self = Self { drops: 0 };

    /// Create an amount, rejecting values above [`MAX_DROPS`].
    pub fn from_drops(drops: u64) -> Option<Self> {
        if drops <= MAX_DROPS {
            Some(Self { drops })
        } else {
            None
        }
    }

    /// The value in drops.
    pub fn drops(&self) -> u64 {
        self.drops
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} drops", self.drops)
    }
}
