//! Canonical binary encoding and decoding.
//!
//! Every conforming implementation must reproduce these bytes exactly: the
//! canonical form feeds hashing, signing, and consensus. Fields are emitted
//! in (type_id, field_code) order, each prefixed by a compact tag of one to
//! three bytes. Nested objects close with the ObjectEndMarker tag, arrays
//! with the ArrayEndMarker tag.
//!
//! Decoding is strict: an unregistered (type_id, field_code) tag is fatal,
//! never skipped, since peers must share the exact dictionary.

use bytes::Bytes;

use crate::error::CodecError;
use crate::fields::{Dictionary, FieldId};
use crate::formats::{Kind, LedgerEntryKind, Requirement, TransactionKind};
use crate::types::{
    AccountId, Amount, Hash128, Hash160, Hash256, TypeId, AMOUNT_ISSUED_BIT, AMOUNT_NATIVE_BIT,
};
use crate::value::{FieldValues, Value};

/// Longest value representable by the variable-length prefix.
pub const MAX_VL_LENGTH: usize = 918_744;

/// Deepest Object/Array nesting accepted during decode. The wire format
/// nests at most a few levels (arrays of wrapped objects); input nested
/// past this bound is malformed, and the bound keeps recursion on
/// attacker-supplied bytes from exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 16;

/// Encode an object to its canonical bytes.
///
/// DEFAULT fields equal to their format-declared default are omitted; use
/// [`encode_with`] to force their inclusion.
pub fn encode(kind: Kind, values: &FieldValues) -> Result<Vec<u8>, CodecError> {
    encode_with(kind, values, false)
}

/// Encode an object, optionally forcing DEFAULT fields onto the wire.
///
/// The kind's discriminant field (TransactionType or LedgerEntryType) is
/// filled in from `kind` when absent; when present it must agree.
pub fn encode_with(
    kind: Kind,
    values: &FieldValues,
    include_defaults: bool,
) -> Result<Vec<u8>, CodecError> {
    let format = kind.format();
    let disc_field = kind.discriminant_field();

    if let Some(value) = values.get(disc_field) {
        match value {
            Value::UInt16(d) if *d == kind.discriminant() => {}
            Value::UInt16(d) => {
                return Err(CodecError::MalformedInput(format!(
                    "{} value {} does not match kind {}",
                    disc_field.name(),
                    d,
                    format.name()
                )))
            }
            other => {
                return Err(CodecError::TypeMismatch {
                    field: disc_field.name(),
                    expected: disc_field.type_id().name(),
                    actual: other.type_id().name(),
                })
            }
        }
    }

    // Every present field must be legal for the kind and carry its type.
    for (field, value) in values.iter() {
        format.requirement_of(field)?;
        if value.type_id() != field.type_id() {
            return Err(CodecError::TypeMismatch {
                field: field.name(),
                expected: field.type_id().name(),
                actual: value.type_id().name(),
            });
        }
    }

    for (field, req) in format.requirements() {
        if req == Requirement::Required && !values.contains(field) && field != disc_field {
            return Err(CodecError::MissingRequiredField {
                kind: format.name(),
                field: field.name(),
            });
        }
    }

    let mut buf = Vec::new();
    let discriminant_value = Value::UInt16(kind.discriminant());
    for field in format.canonical_field_order() {
        let value = match values.get(field) {
            Some(v) => {
                // Omission policy: a DEFAULT field equal to its default
                // stays off the wire unless the caller forces it.
                if !include_defaults
                    && format.requirement_of(field)? == Requirement::Default
                    && format.default_of(field) == Some(v)
                {
                    continue;
                }
                v
            }
            None if field == disc_field => &discriminant_value,
            None => match format.default_of(field) {
                Some(default) if include_defaults => default,
                _ => continue,
            },
        };
        write_tag(&mut buf, field);
        encode_value(&mut buf, value)?;
    }
    Ok(buf)
}

/// Decode canonical bytes back into (kind, values).
///
/// Reads tags until the input is exhausted, resolves the kind from the
/// discriminant field, then enforces the kind's format: every decoded
/// field must be legal and every REQUIRED field must have arrived.
pub fn decode(bytes: &[u8]) -> Result<(Kind, FieldValues), CodecError> {
    let mut reader = Reader::new(bytes);
    let mut values = FieldValues::new();

    while !reader.is_done() {
        let field = read_field(&mut reader)?;
        if field.is_end_marker() {
            return Err(CodecError::MalformedInput(format!(
                "unexpected {} at top level",
                field.name()
            )));
        }
        let value = decode_value(&mut reader, field, 0)?;
        if values.insert(field, value).is_some() {
            return Err(CodecError::MalformedInput(format!(
                "duplicate field {}",
                field.name()
            )));
        }
    }

    let kind = resolve_kind(&values)?;
    let format = kind.format();
    for (field, _) in values.iter() {
        format.requirement_of(field)?;
    }
    for (field, req) in format.requirements() {
        if req == Requirement::Required && !values.contains(field) {
            return Err(CodecError::MissingRequiredField {
                kind: format.name(),
                field: field.name(),
            });
        }
    }
    Ok((kind, values))
}

fn resolve_kind(values: &FieldValues) -> Result<Kind, CodecError> {
    if let Some(Value::UInt16(d)) = values.get(FieldId::TransactionType) {
        return TransactionKind::from_discriminant(*d)
            .map(Kind::Transaction)
            .ok_or_else(|| CodecError::UnknownKind(format!("transaction discriminant {d}")));
    }
    if let Some(Value::UInt16(d)) = values.get(FieldId::LedgerEntryType) {
        return LedgerEntryKind::from_discriminant(*d)
            .map(Kind::LedgerEntry)
            .ok_or_else(|| CodecError::UnknownKind(format!("ledger entry discriminant {d}")));
    }
    Err(CodecError::MalformedInput(
        "no kind discriminant field present".into(),
    ))
}

/// Emit the compact field tag for (type_id, field_code).
///
/// Both below 16: one byte. One of them 16 or above: two bytes. Both 16 or
/// above: three bytes. Serialized field codes always fit in a byte.
fn write_tag(buf: &mut Vec<u8>, field: FieldId) {
    let t = field.type_id().id();
    let f = field.code();
    debug_assert!(t <= 0xff && f <= 0xff);
    match (t < 16, f < 16) {
        (true, true) => buf.push(((t as u8) << 4) | f as u8),
        (true, false) => {
            buf.push((t as u8) << 4);
            buf.push(f as u8);
        }
        (false, true) => {
            buf.push(f as u8);
            buf.push(t as u8);
        }
        (false, false) => {
            buf.push(0);
            buf.push(t as u8);
            buf.push(f as u8);
        }
    }
}

/// Read a field tag and resolve it through the dictionary.
fn read_field(reader: &mut Reader<'_>) -> Result<FieldId, CodecError> {
    let first = reader.read_u8()?;
    let type_nibble = (first >> 4) as u16;
    let field_nibble = (first & 0x0f) as u16;

    let (type_num, code) = match (type_nibble, field_nibble) {
        (0, 0) => {
            let t = reader.read_u8()? as u16;
            let f = reader.read_u8()? as u16;
            if t < 16 || f < 16 {
                return Err(CodecError::MalformedInput("non-canonical field tag".into()));
            }
            (t, f)
        }
        (0, f) => {
            let t = reader.read_u8()? as u16;
            if t < 16 {
                return Err(CodecError::MalformedInput("non-canonical field tag".into()));
            }
            (t, f)
        }
        (t, 0) => {
            let f = reader.read_u8()? as u16;
            if f < 16 {
                return Err(CodecError::MalformedInput("non-canonical field tag".into()));
            }
            (t, f)
        }
        (t, f) => (t, f),
    };

    let type_id = TypeId::from_id(type_num).ok_or(CodecError::UnknownFieldCode {
        type_id: type_num,
        code,
    })?;
    Dictionary::global().field_at(type_id, code)
}

fn encode_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), CodecError> {
    match value {
        Value::UInt8(v) => buf.push(*v),
        Value::UInt16(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::UInt32(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::UInt64(v) => buf.extend_from_slice(&v.to_be_bytes()),
        Value::Hash128(h) => buf.extend_from_slice(h.as_bytes()),
        Value::Hash160(h) => buf.extend_from_slice(h.as_bytes()),
        Value::Hash256(h) => buf.extend_from_slice(h.as_bytes()),
        Value::Amount(a) => {
            buf.extend_from_slice(&(AMOUNT_NATIVE_BIT | a.drops()).to_be_bytes());
        }
        Value::Blob(bytes) => {
            write_vl_length(buf, bytes.len())?;
            buf.extend_from_slice(bytes);
        }
        Value::AccountId(account) => {
            write_vl_length(buf, AccountId::LEN)?;
            buf.extend_from_slice(account.as_bytes());
        }
        Value::Vector256(hashes) => {
            write_vl_length(buf, hashes.len() * Hash256::LEN)?;
            for hash in hashes {
                buf.extend_from_slice(hash.as_bytes());
            }
        }
        Value::Object(inner) => {
            encode_inner_object(buf, inner)?;
        }
        Value::Array(items) => {
            for (item_field, inner) in items {
                if item_field.type_id() != TypeId::Object || item_field.is_end_marker() {
                    return Err(CodecError::MalformedInput(format!(
                        "array item field {} is not object-typed",
                        item_field.name()
                    )));
                }
                write_tag(buf, *item_field);
                encode_inner_object(buf, inner)?;
            }
            write_tag(buf, FieldId::ArrayEndMarker);
        }
    }
    Ok(())
}

/// Emit an inner object's fields in canonical order, then the terminator.
///
/// Inner objects carry no format of their own; any serialized field with a
/// matching value type is legal.
fn encode_inner_object(buf: &mut Vec<u8>, inner: &FieldValues) -> Result<(), CodecError> {
    for (field, value) in inner.iter() {
        if !field.is_serialized() || field.is_end_marker() {
            return Err(CodecError::MalformedInput(format!(
                "field {} cannot appear inside an object",
                field.name()
            )));
        }
        if value.type_id() != field.type_id() {
            return Err(CodecError::TypeMismatch {
                field: field.name(),
                expected: field.type_id().name(),
                actual: value.type_id().name(),
            });
        }
        write_tag(buf, field);
        encode_value(buf, value)?;
    }
    write_tag(buf, FieldId::ObjectEndMarker);
    Ok(())
}

fn decode_value(
    reader: &mut Reader<'_>,
    field: FieldId,
    depth: usize,
) -> Result<Value, CodecError> {
    let value = match field.type_id() {
        TypeId::UInt8 => Value::UInt8(reader.read_u8()?),
        TypeId::UInt16 => Value::UInt16(u16::from_be_bytes(reader.read_array()?)),
        TypeId::UInt32 => Value::UInt32(u32::from_be_bytes(reader.read_array()?)),
        TypeId::UInt64 => Value::UInt64(u64::from_be_bytes(reader.read_array()?)),
        TypeId::Hash128 => Value::Hash128(Hash128::from_bytes(reader.read_array()?)),
        TypeId::Hash160 => Value::Hash160(Hash160::from_bytes(reader.read_array()?)),
        TypeId::Hash256 => Value::Hash256(Hash256::from_bytes(reader.read_array()?)),
        TypeId::Amount => {
            let raw = u64::from_be_bytes(reader.read_array()?);
            if raw & AMOUNT_ISSUED_BIT != 0 {
                return Err(CodecError::MalformedInput(
                    "issued amounts are not carried by this protocol".into(),
                ));
            }
            if raw & AMOUNT_NATIVE_BIT == 0 {
                return Err(CodecError::MalformedInput(
                    "amount is missing the native marker bit".into(),
                ));
            }
            let drops = raw & !AMOUNT_NATIVE_BIT;
            let amount = Amount::from_drops(drops).ok_or_else(|| {
                CodecError::MalformedInput(format!("amount {drops} exceeds the maximum"))
            })?;
            Value::Amount(amount)
        }
        TypeId::Blob => {
            let len = read_vl_length(reader)?;
            Value::Blob(Bytes::copy_from_slice(reader.read_exact(len)?))
        }
        TypeId::AccountId => {
            let len = read_vl_length(reader)?;
            if len != AccountId::LEN {
                return Err(CodecError::MalformedInput(format!(
                    "account identifier length {len}, expected {}",
                    AccountId::LEN
                )));
            }
            let mut bytes = [0u8; AccountId::LEN];
            bytes.copy_from_slice(reader.read_exact(len)?);
            Value::AccountId(AccountId::from_bytes(bytes))
        }
        TypeId::Vector256 => {
            let len = read_vl_length(reader)?;
            if len % Hash256::LEN != 0 {
                return Err(CodecError::MalformedInput(format!(
                    "vector length {len} is not a multiple of {}",
                    Hash256::LEN
                )));
            }
            let mut hashes = Vec::with_capacity(len / Hash256::LEN);
            for _ in 0..len / Hash256::LEN {
                let mut bytes = [0u8; Hash256::LEN];
                bytes.copy_from_slice(reader.read_exact(Hash256::LEN)?);
                hashes.push(Hash256::from_bytes(bytes));
            }
            Value::Vector256(hashes)
        }
        TypeId::Object => Value::Object(decode_inner_object(reader, depth + 1)?),
        TypeId::Array => {
            let mut items = Vec::new();
            loop {
                let item_field = read_field(reader)?;
                if item_field == FieldId::ArrayEndMarker {
                    break;
                }
                if item_field.type_id() != TypeId::Object || item_field.is_end_marker() {
                    return Err(CodecError::MalformedInput(format!(
                        "array item field {} is not object-typed",
                        item_field.name()
                    )));
                }
                items.push((item_field, decode_inner_object(reader, depth + 1)?));
            }
            Value::Array(items)
        }
    };
    Ok(value)
}

/// Read inner object fields up to the ObjectEndMarker tag.
fn decode_inner_object(reader: &mut Reader<'_>, depth: usize) -> Result<FieldValues, CodecError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::MalformedInput(format!(
            "nesting exceeds {MAX_NESTING_DEPTH} levels"
        )));
    }
    let mut inner = FieldValues::new();
    loop {
        let field = read_field(reader)?;
        if field == FieldId::ObjectEndMarker {
            return Ok(inner);
        }
        if field == FieldId::ArrayEndMarker {
            return Err(CodecError::MalformedInput(
                "array terminator inside an object".into(),
            ));
        }
        let value = decode_value(reader, field, depth)?;
        if inner.insert(field, value).is_some() {
            return Err(CodecError::MalformedInput(format!(
                "duplicate field {} in object",
                field.name()
            )));
        }
    }
}

/// Emit a variable-length prefix: one byte up to 192, two up to 12480,
/// three up to [`MAX_VL_LENGTH`].
fn write_vl_length(buf: &mut Vec<u8>, len: usize) -> Result<(), CodecError> {
    if len <= 192 {
        buf.push(len as u8);
    } else if len <= 12_480 {
        let adjusted = len - 193;
        buf.push(193 + (adjusted >> 8) as u8);
        buf.push((adjusted & 0xff) as u8);
    } else if len <= MAX_VL_LENGTH {
        let adjusted = len - 12_481;
        buf.push(241 + (adjusted >> 16) as u8);
        buf.push(((adjusted >> 8) & 0xff) as u8);
        buf.push((adjusted & 0xff) as u8);
    } else {
        return Err(CodecError::MalformedInput(format!(
            "length {len} exceeds the variable-length maximum"
        )));
    }
    Ok(())
}

fn read_vl_length(reader: &mut Reader<'_>) -> Result<usize, CodecError> {
    let first = reader.read_u8()? as usize;
    if first <= 192 {
        Ok(first)
    } else if first <= 240 {
        let second = reader.read_u8()? as usize;
        Ok(193 + (first - 193) * 256 + second)
    } else if first <= 254 {
        let second = reader.read_u8()? as usize;
        let third = reader.read_u8()? as usize;
        let len = 12_481 + (first - 241) * 65_536 + second * 256 + third;
        if len > MAX_VL_LENGTH {
            return Err(CodecError::MalformedInput(format!(
                "length {len} exceeds the variable-length maximum"
            )));
        }
        Ok(len)
    } else {
        Err(CodecError::MalformedInput(
            "invalid variable-length prefix".into(),
        ))
    }
}

/// Cursor over the input bytes. Every read checks the remaining length;
/// running short is MalformedInput, never a panic.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn read_u8(&mut self) -> Result<u8, CodecError> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| CodecError::MalformedInput("unexpected end of input".into()))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_exact(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        if self.bytes.len() - self.pos < len {
            return Err(CodecError::MalformedInput("unexpected end of input".into()));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn payment_values() -> FieldValues {
        let mut values = FieldValues::new();
        values.insert(
            FieldId::TransactionType,
            Value::UInt16(TransactionKind::Payment.discriminant()),
        );
        values.insert(FieldId::Account, Value::AccountId(AccountId::from_bytes([0x11; 20])));
        values.insert(FieldId::Sequence, Value::UInt32(7));
        values.insert(FieldId::Fee, Value::Amount(Amount::from_drops(10).unwrap()));
        values.insert(FieldId::Amount, Value::Amount(Amount::from_drops(100).unwrap()));
        values.insert(
            FieldId::Destination,
            Value::AccountId(AccountId::from_bytes([0x22; 20])),
        );
        values
    }

    fn payment_kind() -> Kind {
        Kind::Transaction(TransactionKind::Payment)
    }

    #[test]
    fn test_payment_roundtrip() {
        let values = payment_values();
        let bytes = encode(payment_kind(), &values).unwrap();
        let (kind, decoded) = decode(&bytes).unwrap();
        assert_eq!(kind, payment_kind());
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_amount_tag_precedes_destination_tag() {
        let bytes = encode(payment_kind(), &payment_values()).unwrap();
        let hex = hex::encode(&bytes);
        let amount_at = hex.find("614000000000000064").unwrap();
        let destination_at = hex.find("8314").unwrap();
        assert!(amount_at < destination_at);
    }

    #[test]
    fn test_discriminant_autofilled() {
        let mut values = payment_values();
        values.remove(FieldId::TransactionType);
        let bytes = encode(payment_kind(), &values).unwrap();
        let (kind, decoded) = decode(&bytes).unwrap();
        assert_eq!(kind, payment_kind());
        assert_eq!(
            decoded.get(FieldId::TransactionType),
            Some(&Value::UInt16(0))
        );
    }

    #[test]
    fn test_discriminant_mismatch_rejected() {
        let mut values = payment_values();
        values.insert(
            FieldId::TransactionType,
            Value::UInt16(TransactionKind::TrustSet.discriminant()),
        );
        let err = encode(payment_kind(), &values).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_field_not_allowed_on_encode() {
        let mut values = payment_values();
        values.insert(
            FieldId::LimitAmount,
            Value::Amount(Amount::from_drops(1).unwrap()),
        );
        let err = encode(payment_kind(), &values).unwrap_err();
        assert_eq!(
            err,
            CodecError::FieldNotAllowed {
                kind: "Payment",
                field: "LimitAmount"
            }
        );
    }

    #[test]
    fn test_missing_required_field() {
        let mut values = payment_values();
        values.remove(FieldId::Destination);
        let err = encode(payment_kind(), &values).unwrap_err();
        assert_eq!(
            err,
            CodecError::MissingRequiredField {
                kind: "Payment",
                field: "Destination"
            }
        );
    }

    #[test]
    fn test_type_mismatch_on_encode() {
        let mut values = payment_values();
        values.insert(FieldId::Amount, Value::UInt32(100));
        let err = encode(payment_kind(), &values).unwrap_err();
        assert_eq!(
            err,
            CodecError::TypeMismatch {
                field: "Amount",
                expected: "Amount",
                actual: "UInt32"
            }
        );
    }

    #[test]
    fn test_default_flags_omitted_and_roundtrip() {
        let mut values = payment_values();
        values.insert(FieldId::Flags, Value::UInt32(0));
        let bytes = encode(payment_kind(), &values).unwrap();
        // Flags tag (0x22) must be absent.
        let without_flags = {
            let mut v = payment_values();
            v.remove(FieldId::Flags);
            encode(payment_kind(), &v).unwrap()
        };
        assert_eq!(bytes, without_flags);

        let (_, decoded) = decode(&bytes).unwrap();
        assert_eq!(decoded.get(FieldId::Flags), None);
    }

    #[test]
    fn test_nondefault_flags_emitted() {
        let mut values = payment_values();
        values.insert(FieldId::Flags, Value::UInt32(0x8000_0000));
        let bytes = encode(payment_kind(), &values).unwrap();
        let (_, decoded) = decode(&bytes).unwrap();
        assert_eq!(decoded.get(FieldId::Flags), Some(&Value::UInt32(0x8000_0000)));
    }

    #[test]
    fn test_forced_defaults_roundtrip_to_default() {
        let values = payment_values();
        let bytes = encode_with(payment_kind(), &values, true).unwrap();
        let (_, decoded) = decode(&bytes).unwrap();
        assert_eq!(decoded.get(FieldId::Flags), Some(&Value::UInt32(0)));
    }

    #[test]
    fn test_unknown_field_code_is_fatal() {
        // Valid Payment bytes followed by an unregistered tag: type 6
        // (Amount), code 15 has no dictionary entry.
        let mut bytes = encode(payment_kind(), &payment_values()).unwrap();
        bytes.push(0x6f);
        bytes.extend_from_slice(&(AMOUNT_NATIVE_BIT | 1).to_be_bytes());
        let err = decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownFieldCode {
                type_id: 6,
                code: 15
            }
        );
    }

    #[test]
    fn test_unknown_type_in_tag_is_fatal() {
        // Type nibble 9 is unregistered.
        let err = decode(&[0x91, 0x00]).unwrap_err();
        assert_eq!(
            err,
            CodecError::UnknownFieldCode {
                type_id: 9,
                code: 1
            }
        );
    }

    #[test]
    fn test_truncated_value() {
        // Sequence tag announcing four bytes, only two present.
        let err = decode(&[0x24, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut bytes = Vec::new();
        // Two Sequence fields.
        bytes.extend_from_slice(&[0x24, 0, 0, 0, 1]);
        bytes.extend_from_slice(&[0x24, 0, 0, 0, 2]);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_issued_amount_bit_rejected() {
        let mut bytes = vec![0x61];
        bytes.extend_from_slice(&(AMOUNT_ISSUED_BIT | 5).to_be_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_amount_without_native_bit_rejected() {
        // Neither bit 63 nor bit 62 set: not a native amount word.
        let mut bytes = vec![0x61];
        bytes.extend_from_slice(&100u64.to_be_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_runaway_nesting_rejected() {
        // An unbounded run of Memo tags must come back as an error, not
        // recurse once per tag until the stack is gone.
        let bytes = vec![0xea; 60_000];
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_nesting_at_the_bound() {
        // MAX_NESTING_DEPTH open Memo tags, then matching terminators:
        // exactly at the bound decodes, one deeper does not.
        let nested = |levels: usize| {
            let mut bytes = vec![0xea; levels];
            bytes.extend(std::iter::repeat(0xe1).take(levels));
            bytes
        };
        // The outermost Memo resolves to a top-level Object field, so the
        // decoded kind check fails later; the nesting itself must not.
        let err = decode(&nested(MAX_NESTING_DEPTH)).unwrap_err();
        assert!(!matches!(&err, CodecError::MalformedInput(m) if m.contains("nesting")));
        let err = decode(&nested(MAX_NESTING_DEPTH + 1)).unwrap_err();
        assert!(matches!(&err, CodecError::MalformedInput(m) if m.contains("nesting")));
    }

    #[test]
    fn test_unknown_discriminant() {
        let mut bytes = Vec::new();
        write_tag(&mut bytes, FieldId::TransactionType);
        bytes.extend_from_slice(&9999u16.to_be_bytes());
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::UnknownKind(_)));
    }

    #[test]
    fn test_no_discriminant() {
        let bytes = [0x24, 0, 0, 0, 1];
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_memos_roundtrip() {
        let mut memo = FieldValues::new();
        memo.insert(FieldId::MemoType, Value::Blob(Bytes::from_static(b"text")));
        memo.insert(FieldId::MemoData, Value::Blob(Bytes::from_static(b"hello")));

        let mut values = payment_values();
        values.insert(FieldId::Memos, Value::Array(vec![(FieldId::Memo, memo)]));

        let bytes = encode(payment_kind(), &values).unwrap();
        let (_, decoded) = decode(&bytes).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_array_terminators_on_wire() {
        let mut memo = FieldValues::new();
        memo.insert(FieldId::MemoType, Value::Blob(Bytes::from_static(b"t")));

        let mut values = payment_values();
        values.insert(FieldId::Memos, Value::Array(vec![(FieldId::Memo, memo)]));

        let hex = hex::encode(encode(payment_kind(), &values).unwrap());
        // Memos (15,9), Memo (14,10), MemoType (7,12), ObjectEndMarker
        // (14,1), ArrayEndMarker (15,1).
        assert!(hex.contains("f9ea7c0174e1f1"));
    }

    #[test]
    fn test_unterminated_array_is_malformed() {
        let mut memo = FieldValues::new();
        memo.insert(FieldId::MemoType, Value::Blob(Bytes::from_static(b"t")));
        let mut values = payment_values();
        values.insert(FieldId::Memos, Value::Array(vec![(FieldId::Memo, memo)]));

        let mut bytes = encode(payment_kind(), &values).unwrap();
        bytes.pop(); // drop the ArrayEndMarker tag
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    #[test]
    fn test_two_byte_tags() {
        // LastLedgerSequence is (2, 27): type nibble set, code in a
        // trailing byte. Hashes is (19, 2): code nibble set, type in a
        // trailing byte.
        let mut values = FieldValues::new();
        values.insert(
            FieldId::LedgerEntryType,
            Value::UInt16(LedgerEntryKind::LedgerHashes.discriminant()),
        );
        values.insert(FieldId::LastLedgerSequence, Value::UInt32(9));
        values.insert(
            FieldId::Hashes,
            Value::Vector256(vec![Hash256::from_bytes([0xaa; 32])]),
        );

        let kind = Kind::LedgerEntry(LedgerEntryKind::LedgerHashes);
        let bytes = encode(kind, &values).unwrap();
        let hex = hex::encode(&bytes);
        assert!(hex.starts_with("110068"));
        assert!(hex.contains("201b00000009"));
        assert!(hex.contains("021320"));

        let (decoded_kind, decoded) = decode(&bytes).unwrap();
        assert_eq!(decoded_kind, kind);
        assert_eq!(decoded, values);
    }

    #[test]
    fn test_vl_length_boundaries() {
        for len in [0usize, 1, 192, 193, 12_480, 12_481, MAX_VL_LENGTH] {
            let mut buf = Vec::new();
            write_vl_length(&mut buf, len).unwrap();
            let mut reader = Reader::new(&buf);
            assert_eq!(read_vl_length(&mut reader).unwrap(), len);
            assert!(reader.is_done());
        }
        let mut buf = Vec::new();
        assert!(write_vl_length(&mut buf, MAX_VL_LENGTH + 1).is_err());
    }

    #[test]
    fn test_account_id_wrong_length() {
        // Account tag with a 19-byte body.
        let mut bytes = vec![0x81, 0x13];
        bytes.extend_from_slice(&[0u8; 19]);
        let err = decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::MalformedInput(_)));
    }

    proptest! {
        #[test]
        fn vl_length_roundtrips(len in 0usize..=MAX_VL_LENGTH) {
            let mut buf = Vec::new();
            write_vl_length(&mut buf, len).unwrap();
            let mut reader = Reader::new(&buf);
            prop_assert_eq!(read_vl_length(&mut reader).unwrap(), len);
            prop_assert!(reader.is_done());
        }

        #[test]
        fn blob_payloads_roundtrip(payload in prop::collection::vec(any::<u8>(), 0..512)) {
            let mut values = payment_values();
            values.insert(FieldId::SigningPubKey, Value::Blob(Bytes::from(payload)));
            let bytes = encode(payment_kind(), &values).unwrap();
            let (_, decoded) = decode(&bytes).unwrap();
            prop_assert_eq!(decoded, values);
        }
    }

    #[test]
    fn test_insertion_order_does_not_change_bytes() {
        let values = payment_values();
        let mut reversed = FieldValues::new();
        let entries: Vec<(FieldId, Value)> =
            values.iter().map(|(f, v)| (f, v.clone())).collect();
        for (field, value) in entries.into_iter().rev() {
            reversed.insert(field, value);
        }
        assert_eq!(
            encode(payment_kind(), &values).unwrap(),
            encode(payment_kind(), &reversed).unwrap()
        );
    }
}
