//! The declarative protocol description.
//!
//! A JSON document with three ordered lists: `fields`, `transactions`, and
//! `ledgerEntries`. It is loaded independently of the compiled tables and
//! serves as the authoritative source the validator checks against.
//! Empty-named rows are reserved placeholders and are skipped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// One field row: name, owning type name, numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: u16,
}

/// One kind row: name plus (field name, requirement string) pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindEntry {
    pub name: String,
    pub fields: Vec<(String, String)>,
}

/// The whole description document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolDescription {
    pub fields: Vec<FieldEntry>,
    pub transactions: Vec<KindEntry>,
    #[serde(rename = "ledgerEntries")]
    pub ledger_entries: Vec<KindEntry>,
}

impl ProtocolDescription {
    /// Parse a description from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ProtocolError> {
        let description: ProtocolDescription = serde_json::from_str(json)?;
        tracing::debug!(
            fields = description.fields.len(),
            transactions = description.transactions.len(),
            ledger_entries = description.ledger_entries.len(),
            "parsed protocol description"
        );
        Ok(description)
    }

    /// Load a description from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading protocol description");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// The description snapshot bundled with this crate.
    pub fn bundled() -> Result<Self, ProtocolError> {
        Self::from_json_str(include_str!("../protocol.json"))
    }
}
