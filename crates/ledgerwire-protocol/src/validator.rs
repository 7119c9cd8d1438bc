//! Cross-validation of the compiled tables against the description.
//!
//! A pure batch comparison: every check runs and every mismatch is
//! collected, so a drifted description can be fixed in one pass. Intended
//! for build/test time; it never touches runtime state.

use std::collections::HashSet;
use std::fmt;

use ledgerwire_core::{Dictionary, Format, Kind, LedgerEntryKind, Requirement, TransactionKind};

use crate::description::{KindEntry, ProtocolDescription};
use crate::error::ProtocolError;

/// One discrepancy between the description and the compiled tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A description field row that no compiled field matches.
    UnknownDescriptionField { name: String },
    /// A description field row naming a type the registry does not have.
    UnknownDescriptionType { field: String, type_name: String },
    /// Field type disagreement: description vs compiled.
    FieldTypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },
    /// Field code disagreement: description vs compiled.
    FieldCodeMismatch {
        field: String,
        expected: u16,
        actual: u16,
    },
    /// A serializable compiled field (other than the two sentinels) the
    /// description does not list.
    MissingDescriptionField { field: String },
    /// The same field name listed twice in the description.
    DuplicateDescriptionField { name: String },
    /// A description kind row no closed enumeration member matches.
    UnknownDescriptionKind { kind: String },
    /// An enumeration member the description does not list.
    MissingDescriptionKind { kind: String },
    /// The same kind name listed twice in the description.
    DuplicateDescriptionKind { kind: String },
    /// A description format row naming a field the compiled format lacks
    /// (or a field name outside the dictionary entirely).
    UnknownFormatField { kind: String, field: String },
    /// The same field listed twice within one kind's format rows.
    DuplicateFormatField { kind: String, field: String },
    /// A requirement string the description defines but code disagrees on.
    RequirementMismatch {
        kind: String,
        field: String,
        expected: String,
        actual: String,
    },
    /// Entry counts differ: the requirement sets are not equal.
    FormatArity {
        kind: String,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnknownDescriptionField { name } => {
                write!(f, "description field {name} has no compiled counterpart")
            }
            Violation::UnknownDescriptionType { field, type_name } => {
                write!(f, "description field {field} names unknown type {type_name}")
            }
            Violation::FieldTypeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field {field}: description says type {expected}, code says {actual}"
            ),
            Violation::FieldCodeMismatch {
                field,
                expected,
                actual,
            } => write!(
                f,
                "field {field}: description says code {expected}, code says {actual}"
            ),
            Violation::MissingDescriptionField { field } => {
                write!(f, "serialized field {field} is absent from the description")
            }
            Violation::DuplicateDescriptionField { name } => {
                write!(f, "description lists field {name} more than once")
            }
            Violation::UnknownDescriptionKind { kind } => {
                write!(f, "description kind {kind} has no compiled counterpart")
            }
            Violation::MissingDescriptionKind { kind } => {
                write!(f, "kind {kind} is absent from the description")
            }
            Violation::DuplicateDescriptionKind { kind } => {
                write!(f, "description lists kind {kind} more than once")
            }
            Violation::UnknownFormatField { kind, field } => {
                write!(f, "{kind}: description field {field} is not in the compiled format")
            }
            Violation::DuplicateFormatField { kind, field } => {
                write!(f, "{kind}: description lists field {field} more than once")
            }
            Violation::RequirementMismatch {
                kind,
                field,
                expected,
                actual,
            } => write!(
                f,
                "{kind}.{field}: description says {expected}, code says {actual}"
            ),
            Violation::FormatArity {
                kind,
                expected,
                actual,
            } => write!(
                f,
                "{kind}: description lists {expected} fields, compiled format has {actual}"
            ),
        }
    }
}

/// Run every consistency check, collecting all violations.
pub fn validate(description: &ProtocolDescription) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_fields(description, &mut violations);
    check_kinds(
        &description.transactions,
        TransactionKind::ALL.iter().map(|k| k.name()),
        &mut violations,
    );
    check_kinds(
        &description.ledger_entries,
        LedgerEntryKind::ALL.iter().map(|k| k.name()),
        &mut violations,
    );
    tracing::debug!(violations = violations.len(), "consistency validation done");
    violations
}

/// Validate and fail on any violation.
pub fn ensure_consistent(description: &ProtocolDescription) -> Result<(), ProtocolError> {
    let violations = validate(description);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ProtocolError::Inconsistent { violations })
    }
}

fn check_fields(description: &ProtocolDescription, violations: &mut Vec<Violation>) {
    let dictionary = Dictionary::global();
    let mut seen: HashSet<&str> = HashSet::new();

    for entry in &description.fields {
        if entry.name.is_empty() {
            continue;
        }
        if !seen.insert(&entry.name) {
            violations.push(Violation::DuplicateDescriptionField {
                name: entry.name.clone(),
            });
            continue;
        }
        let field = match dictionary.field_of(&entry.name) {
            Ok(field) => field,
            Err(_) => {
                violations.push(Violation::UnknownDescriptionField {
                    name: entry.name.clone(),
                });
                continue;
            }
        };
        match ledgerwire_core::TypeId::from_name(&entry.type_name) {
            Ok(type_id) => {
                if field.type_id() != type_id {
                    violations.push(Violation::FieldTypeMismatch {
                        field: entry.name.clone(),
                        expected: entry.type_name.clone(),
                        actual: field.type_id().name().to_string(),
                    });
                }
            }
            Err(_) => violations.push(Violation::UnknownDescriptionType {
                field: entry.name.clone(),
                type_name: entry.type_name.clone(),
            }),
        }
        if field.code() != entry.value {
            violations.push(Violation::FieldCodeMismatch {
                field: entry.name.clone(),
                expected: entry.value,
                actual: field.code(),
            });
        }
    }

    // Every serialized field except the two sentinels must be described.
    for field in dictionary.all() {
        if field.is_serialized() && !field.is_end_marker() && !seen.contains(field.name()) {
            violations.push(Violation::MissingDescriptionField {
                field: field.name().to_string(),
            });
        }
    }
}

fn check_kinds<'a>(
    entries: &[KindEntry],
    compiled_kinds: impl Iterator<Item = &'a str>,
    violations: &mut Vec<Violation>,
) {
    let mut seen: HashSet<&str> = HashSet::new();

    for entry in entries {
        if entry.name.is_empty() {
            continue;
        }
        if !seen.insert(&entry.name) {
            violations.push(Violation::DuplicateDescriptionKind {
                kind: entry.name.clone(),
            });
            continue;
        }
        let format = match Kind::from_name(&entry.name) {
            Ok(kind) => kind.format(),
            Err(_) => {
                violations.push(Violation::UnknownDescriptionKind {
                    kind: entry.name.clone(),
                });
                continue;
            }
        };
        check_format(entry, format, violations);
    }

    for name in compiled_kinds {
        if !seen.contains(name) {
            violations.push(Violation::MissingDescriptionKind {
                kind: name.to_string(),
            });
        }
    }
}

fn check_format(entry: &KindEntry, format: &Format, violations: &mut Vec<Violation>) {
    let dictionary = Dictionary::global();
    let mut seen: HashSet<&str> = HashSet::new();

    for (field_name, requirement_name) in &entry.fields {
        if !seen.insert(field_name) {
            violations.push(Violation::DuplicateFormatField {
                kind: entry.name.clone(),
                field: field_name.clone(),
            });
            continue;
        }
        let requirement = match dictionary
            .field_of(field_name)
            .ok()
            .and_then(|field| format.requirement_of(field).ok())
        {
            Some(requirement) => requirement,
            None => {
                violations.push(Violation::UnknownFormatField {
                    kind: entry.name.clone(),
                    field: field_name.clone(),
                });
                continue;
            }
        };
        let matches = Requirement::from_str_opt(requirement_name)
            .is_some_and(|descriptor| descriptor == requirement);
        if !matches {
            violations.push(Violation::RequirementMismatch {
                kind: entry.name.clone(),
                field: field_name.clone(),
                expected: requirement_name.clone(),
                actual: requirement.as_str().to_string(),
            });
        }
    }

    // Strict set equality over distinct row names: with every distinct row
    // matched above, equal counts mean equal sets. Duplicated rows were
    // already reported and must not pad the count.
    if seen.len() != format.len() {
        violations.push(Violation::FormatArity {
            kind: entry.name.clone(),
            expected: seen.len(),
            actual: format.len(),
        });
    }
}

/// Convenience check of a dictionary/description bijection used by tests:
/// every serialized field except the sentinels appears exactly once.
pub fn described_field_names(description: &ProtocolDescription) -> HashSet<&str> {
    description
        .fields
        .iter()
        .filter(|f| !f.name.is_empty())
        .map(|f| f.name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::FieldEntry;
    use ledgerwire_core::FieldId;

    fn bundled() -> ProtocolDescription {
        ProtocolDescription::bundled().unwrap()
    }

    #[test]
    fn test_bundled_description_is_consistent() {
        let violations = validate(&bundled());
        assert!(
            violations.is_empty(),
            "unexpected violations: {:#?}",
            violations
        );
        assert!(ensure_consistent(&bundled()).is_ok());
    }

    #[test]
    fn test_dictionary_bijection() {
        let description = bundled();
        let names = described_field_names(&description);
        for field in FieldId::ALL {
            if field.is_serialized() && !field.is_end_marker() {
                assert!(names.contains(field.name()), "{} not described", field.name());
            }
        }
        assert!(!names.contains("ObjectEndMarker"));
        assert!(!names.contains("ArrayEndMarker"));
    }

    #[test]
    fn test_payment_set_equality() {
        let description = bundled();
        let entry = description
            .transactions
            .iter()
            .find(|t| t.name == "Payment")
            .unwrap();
        let format = Kind::from_name("Payment").unwrap().format();
        assert_eq!(entry.fields.len(), format.len());
        for (field_name, _) in &entry.fields {
            let field = Dictionary::global().field_of(field_name).unwrap();
            assert!(format.requirement_of(field).is_ok());
        }
    }

    #[test]
    fn test_removed_field_reported() {
        let mut description = bundled();
        description.fields.retain(|f| f.name != "Amount");
        let violations = validate(&description);
        assert!(violations.contains(&Violation::MissingDescriptionField {
            field: "Amount".to_string()
        }));
    }

    #[test]
    fn test_extra_field_reported() {
        let mut description = bundled();
        description.fields.push(FieldEntry {
            name: "Imaginary".to_string(),
            type_name: "UInt32".to_string(),
            value: 99,
        });
        let violations = validate(&description);
        assert!(violations.contains(&Violation::UnknownDescriptionField {
            name: "Imaginary".to_string()
        }));
    }

    #[test]
    fn test_drifted_code_reported() {
        let mut description = bundled();
        for field in &mut description.fields {
            if field.name == "Destination" {
                field.value = 12;
            }
        }
        let violations = validate(&description);
        assert!(violations.contains(&Violation::FieldCodeMismatch {
            field: "Destination".to_string(),
            expected: 12,
            actual: 3
        }));
    }

    #[test]
    fn test_drifted_type_reported() {
        let mut description = bundled();
        for field in &mut description.fields {
            if field.name == "Amount" {
                field.type_name = "UInt64".to_string();
            }
        }
        let violations = validate(&description);
        assert!(violations.contains(&Violation::FieldTypeMismatch {
            field: "Amount".to_string(),
            expected: "UInt64".to_string(),
            actual: "Amount".to_string()
        }));
    }

    #[test]
    fn test_requirement_drift_reported() {
        let mut description = bundled();
        for tx in &mut description.transactions {
            if tx.name == "Payment" {
                for field in &mut tx.fields {
                    if field.0 == "Destination" {
                        field.1 = "OPTIONAL".to_string();
                    }
                }
            }
        }
        let violations = validate(&description);
        assert!(violations.contains(&Violation::RequirementMismatch {
            kind: "Payment".to_string(),
            field: "Destination".to_string(),
            expected: "OPTIONAL".to_string(),
            actual: "REQUIRED".to_string()
        }));
    }

    #[test]
    fn test_format_arity_reported() {
        let mut description = bundled();
        for tx in &mut description.transactions {
            if tx.name == "Payment" {
                tx.fields.retain(|(name, _)| name != "SendMax");
            }
        }
        let violations = validate(&description);
        let format = Kind::from_name("Payment").unwrap().format();
        assert!(violations.contains(&Violation::FormatArity {
            kind: "Payment".to_string(),
            expected: format.len() - 1,
            actual: format.len()
        }));
    }

    #[test]
    fn test_duplicated_format_row_reported() {
        // Duplicating one row while dropping another keeps the row count
        // equal to the compiled format, so equality must be judged on
        // distinct names, not raw counts.
        let mut description = bundled();
        for tx in &mut description.transactions {
            if tx.name == "Payment" {
                tx.fields.retain(|(name, _)| name != "SendMax");
                tx.fields.push(("Amount".to_string(), "REQUIRED".to_string()));
            }
        }
        let violations = validate(&description);
        assert!(violations.contains(&Violation::DuplicateFormatField {
            kind: "Payment".to_string(),
            field: "Amount".to_string()
        }));
        let format = Kind::from_name("Payment").unwrap().format();
        assert!(violations.contains(&Violation::FormatArity {
            kind: "Payment".to_string(),
            expected: format.len() - 1,
            actual: format.len()
        }));
    }

    #[test]
    fn test_missing_kind_reported() {
        let mut description = bundled();
        description.transactions.retain(|t| t.name != "TrustSet");
        let violations = validate(&description);
        assert!(violations.contains(&Violation::MissingDescriptionKind {
            kind: "TrustSet".to_string()
        }));
    }

    #[test]
    fn test_unknown_kind_reported() {
        let mut description = bundled();
        description.transactions.push(KindEntry {
            name: "EscrowCreate".to_string(),
            fields: vec![],
        });
        let violations = validate(&description);
        assert!(violations.contains(&Violation::UnknownDescriptionKind {
            kind: "EscrowCreate".to_string()
        }));
    }

    #[test]
    fn test_empty_named_rows_skipped() {
        let mut description = bundled();
        description.fields.push(FieldEntry {
            name: String::new(),
            type_name: "UInt32".to_string(),
            value: 1,
        });
        description.transactions.push(KindEntry {
            name: String::new(),
            fields: vec![],
        });
        assert!(validate(&description).is_empty());
    }

    #[test]
    fn test_all_violations_collected() {
        let mut description = bundled();
        description.fields.retain(|f| f.name != "Amount");
        description.transactions.retain(|t| t.name != "TrustSet");
        let violations = validate(&description);
        assert!(violations.len() >= 2);
    }
}
