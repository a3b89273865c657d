// Field specifications and the primitive decoders behind them

use crate::catalog::NamedValue;
use crate::error::{DecodeError, Result};
use crate::schema::structure::StructDef;
use crate::schema::value::Value;
use crate::schema::view::StructView;
use chrono::{DateTime, FixedOffset};
use std::sync::Arc;

/// Element decoding for dependent-length arrays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemKind {
    Bytes,
    Text,
}

/// The closed set of semantic field types.
///
/// Decoding dispatches over this enum exhaustively, so adding a type
/// forces every decode site to handle it.
#[derive(Debug, Clone)]
pub enum FieldType {
    /// Raw byte slice, returned unchanged
    Bytes,
    /// Big-endian unsigned integer of the field's width (at most 8 bytes)
    Uint,
    /// UTF-8 text, truncated at the first NUL byte
    Text,
    /// Unsigned integer wrapped in a `NamedValue` with deferred label lookup
    Named { mapping_key: String },
    /// Six bytes of calendar components at a fixed UTC+8 offset
    Time,
    /// Nested structure, decoded lazily as a child `StructView`
    Struct(Arc<StructDef>),
    /// Trailing array whose width is `count * elem_width`, where both
    /// factors are earlier sibling integer fields
    DependentArray {
        count_field: String,
        width_field: String,
        elem: ElemKind,
    },
}

impl FieldType {
    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Bytes => "bytes",
            FieldType::Uint => "uint",
            FieldType::Text => "text",
            FieldType::Named { .. } => "named",
            FieldType::Time => "time",
            FieldType::Struct(_) => "struct",
            FieldType::DependentArray { .. } => "array",
        }
    }
}

/// One named field of a structure definition.
///
/// Immutable once the owning `StructDef` is built; the offset is
/// assigned exactly once by offset propagation. A width of zero marks
/// a dependent-length placeholder resolved per decode.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    width: usize,
    offset: usize,
    ty: FieldType,
}

impl FieldSpec {
    pub(crate) fn new(name: impl Into<String>, width: usize, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            width,
            offset: 0,
            ty,
        }
    }

    pub(crate) fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Static byte width; zero for dependent-length placeholders
    pub fn width(&self) -> usize {
        self.width
    }

    /// Byte offset relative to the structure start
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn ty(&self) -> &FieldType {
        &self.ty
    }
}

/// Decode a big-endian unsigned integer of arbitrary width up to 8 bytes
pub fn decode_uint(bytes: &[u8]) -> Result<u64> {
    if bytes.len() > 8 {
        return Err(DecodeError::UnsupportedFieldType(format!(
            "{}-byte integer exceeds the 8-byte maximum",
            bytes.len()
        )));
    }
    let mut value = 0u64;
    for &b in bytes {
        value = (value << 8) | u64::from(b);
    }
    Ok(value)
}

/// Decode text with C-string semantics: truncate at the first NUL byte,
/// replace invalid UTF-8 rather than erroring
pub fn decode_text(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).to_string()
}

/// A dependent-length array after its dimensions have been resolved
#[derive(Debug, Clone)]
pub struct ArrayField {
    data: Vec<u8>,
    count: usize,
    elem_width: usize,
    elem: ElemKind,
}

impl ArrayField {
    pub(crate) fn new(data: Vec<u8>, count: usize, elem_width: usize, elem: ElemKind) -> Self {
        Self {
            data,
            count,
            elem_width,
            elem,
        }
    }

    /// Number of elements, as declared by the sibling count field
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn elem_width(&self) -> usize {
        self.elem_width
    }

    /// Decode element @index, bounds-checked against the decoded count
    pub fn element(&self, index: usize) -> Result<DecodedField> {
        if index >= self.count {
            return Err(DecodeError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        let start = index * self.elem_width;
        let bytes = &self.data[start..start + self.elem_width];
        Ok(match self.elem {
            ElemKind::Bytes => DecodedField::Bytes(bytes.to_vec()),
            ElemKind::Text => DecodedField::Text(decode_text(bytes)),
        })
    }

    fn materialize(&self) -> Result<Value> {
        let mut out = Vec::with_capacity(self.count);
        for i in 0..self.count {
            out.push(self.element(i)?.into_value()?);
        }
        Ok(Value::Array(out))
    }
}

/// The result of decoding one field.
///
/// Nested structures stay lazy (`Struct` holds a view, not a tree);
/// `into_value` unwraps them recursively.
#[derive(Debug, Clone)]
pub enum DecodedField {
    Bytes(Vec<u8>),
    Uint(u64),
    Text(String),
    Named(NamedValue),
    Time(DateTime<FixedOffset>),
    Struct(StructView),
    Array(ArrayField),
}

impl DecodedField {
    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            DecodedField::Bytes(_) => "bytes",
            DecodedField::Uint(_) => "uint",
            DecodedField::Text(_) => "text",
            DecodedField::Named(_) => "named",
            DecodedField::Time(_) => "time",
            DecodedField::Struct(_) => "struct",
            DecodedField::Array(_) => "array",
        }
    }

    /// Recursively unwrap into a plain value tree: nested views become
    /// nested `Value::Struct` trees, named values resolve their labels
    pub fn into_value(self) -> Result<Value> {
        Ok(match self {
            DecodedField::Bytes(b) => Value::Bytes(b),
            DecodedField::Uint(v) => Value::Uint(v),
            DecodedField::Text(s) => Value::Text(s),
            DecodedField::Named(nv) => Value::Named {
                code: nv.code(),
                label: nv.label().to_string(),
            },
            DecodedField::Time(t) => Value::Time(t),
            DecodedField::Struct(view) => view.materialize()?,
            DecodedField::Array(array) => array.materialize()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_uint() {
        assert_eq!(decode_uint(&[0x01, 0x02]).unwrap(), 0x0102);
        assert_eq!(decode_uint(&[0xFF]).unwrap(), 0xFF);
        assert_eq!(decode_uint(&[]).unwrap(), 0);
        assert_eq!(
            decode_uint(&[0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0]).unwrap(),
            0x123456789ABCDEF0
        );
    }

    #[test]
    fn test_decode_uint_too_wide() {
        let bytes = [0u8; 9];
        assert!(matches!(
            decode_uint(&bytes),
            Err(DecodeError::UnsupportedFieldType(_))
        ));
    }

    #[test]
    fn test_decode_text_nul_truncation() {
        assert_eq!(decode_text(b"VIN123\x00\x00\x00"), "VIN123");
        assert_eq!(decode_text(b"no-nul-here"), "no-nul-here");
        assert_eq!(decode_text(b"\x00leading"), "");
    }

    #[test]
    fn test_decode_text_invalid_utf8_is_lossy() {
        let s = decode_text(&[0x41, 0xFF, 0x42]);
        assert!(s.starts_with('A'));
        assert!(s.ends_with('B'));
    }

    #[test]
    fn test_array_field_bounds() {
        let array = ArrayField::new(vec![1, 2, 3, 4, 5, 6], 2, 3, ElemKind::Bytes);
        assert_eq!(array.len(), 2);
        match array.element(1).unwrap() {
            DecodedField::Bytes(b) => assert_eq!(b, vec![4, 5, 6]),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            array.element(2),
            Err(DecodeError::IndexOutOfRange { index: 2, count: 2 })
        ));
    }
}
