// Structure views: bind a definition to a buffer and decode lazily

use crate::buffer::ByteBuffer;
use crate::catalog::NamedValue;
use crate::error::{DecodeError, Result};
use crate::schema::field::{decode_text, decode_uint, ArrayField, DecodedField, FieldType};
use crate::schema::structure::StructDef;
use crate::schema::time::decode_time;
use crate::schema::value::Value;
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Per-view resolved position of one field.
///
/// Fixed fields carry their static offset and width; dependent arrays
/// get their width bound from decoded sibling values, shifting the
/// offsets of everything declared after them.
#[derive(Debug, Clone, Copy)]
struct Slot {
    offset: usize,
    width: usize,
    /// `(count, elem_width)` for dependent arrays
    array: Option<(usize, usize)>,
}

#[derive(Debug, Clone)]
struct Layout {
    slots: Vec<Slot>,
    total_width: usize,
}

#[derive(Debug, Default)]
struct Memo {
    layout: Option<Arc<Layout>>,
    values: HashMap<usize, DecodedField>,
}

/// A structure definition bound to a concrete buffer and base offset.
///
/// Fields decode lazily on first access and are memoized for the life
/// of the view; clones share the memo. Views are freely shareable
/// across threads: the memo is lock-serialized and decoding is a pure
/// function of the immutable buffer, so redundant first-time decodes
/// cannot diverge.
#[derive(Debug, Clone)]
pub struct StructView {
    buffer: ByteBuffer,
    base: usize,
    def: Arc<StructDef>,
    memo: Arc<Mutex<Memo>>,
}

impl StructView {
    /// Bind @def to @buffer starting at @base
    pub fn new(buffer: ByteBuffer, base: usize, def: Arc<StructDef>) -> Self {
        Self {
            buffer,
            base,
            def,
            memo: Arc::new(Mutex::new(Memo::default())),
        }
    }

    pub fn definition(&self) -> &Arc<StructDef> {
        &self.def
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Decode the field called @name, memoizing the result
    pub fn get(&self, name: &str) -> Result<DecodedField> {
        let idx = self.def.field_index(name)?;
        if let Some(value) = self.memo.lock().unwrap().values.get(&idx) {
            return Ok(value.clone());
        }
        let value = self.decode_field(idx)?;
        let mut memo = self.memo.lock().unwrap();
        Ok(memo.values.entry(idx).or_insert(value).clone())
    }

    /// Decode @name as an unsigned integer
    pub fn get_uint(&self, name: &str) -> Result<u64> {
        match self.get(name)? {
            DecodedField::Uint(v) => Ok(v),
            other => Err(self.type_mismatch(name, "uint", &other)),
        }
    }

    /// Decode @name as text
    pub fn get_text(&self, name: &str) -> Result<String> {
        match self.get(name)? {
            DecodedField::Text(s) => Ok(s),
            other => Err(self.type_mismatch(name, "text", &other)),
        }
    }

    /// Decode @name as raw bytes
    pub fn get_bytes(&self, name: &str) -> Result<Vec<u8>> {
        match self.get(name)? {
            DecodedField::Bytes(b) => Ok(b),
            other => Err(self.type_mismatch(name, "bytes", &other)),
        }
    }

    /// Decode @name as a named value
    pub fn get_named(&self, name: &str) -> Result<NamedValue> {
        match self.get(name)? {
            DecodedField::Named(nv) => Ok(nv),
            other => Err(self.type_mismatch(name, "named", &other)),
        }
    }

    /// Decode @name as a calendar timestamp
    pub fn get_time(&self, name: &str) -> Result<DateTime<FixedOffset>> {
        match self.get(name)? {
            DecodedField::Time(t) => Ok(t),
            other => Err(self.type_mismatch(name, "time", &other)),
        }
    }

    /// Decode @name as a nested structure view
    pub fn get_struct(&self, name: &str) -> Result<StructView> {
        match self.get(name)? {
            DecodedField::Struct(view) => Ok(view),
            other => Err(self.type_mismatch(name, "struct", &other)),
        }
    }

    /// Element count of the dependent array @name
    pub fn array_len(&self, name: &str) -> Result<usize> {
        match self.get(name)? {
            DecodedField::Array(a) => Ok(a.len()),
            other => Err(self.type_mismatch(name, "array", &other)),
        }
    }

    /// Element @index of the dependent array @name, bounds-checked
    /// against the decoded count
    pub fn array_element(&self, name: &str, index: usize) -> Result<DecodedField> {
        match self.get(name)? {
            DecodedField::Array(a) => a.element(index),
            other => Err(self.type_mismatch(name, "array", &other)),
        }
    }

    /// Total byte width of the structure after dependent widths have
    /// been resolved against this buffer
    pub fn resolved_width(&self) -> Result<usize> {
        Ok(self.layout()?.total_width)
    }

    /// Recursively decode every declared field into a plain value tree.
    ///
    /// Nested views become nested `Value::Struct` trees and named
    /// values resolve their labels. Idempotent: repeated calls yield
    /// equal trees.
    pub fn materialize(&self) -> Result<Value> {
        let mut out = Vec::with_capacity(self.def.num_fields());
        for spec in self.def.fields() {
            let value = self.get(spec.name())?.into_value()?;
            out.push((spec.name().to_string(), value));
        }
        Ok(Value::Struct(out))
    }

    fn type_mismatch(&self, name: &str, wanted: &str, got: &DecodedField) -> DecodeError {
        DecodeError::UnsupportedFieldType(format!(
            "field '{}' is {}, not {}",
            name,
            got.type_name(),
            wanted
        ))
    }

    fn layout(&self) -> Result<Arc<Layout>> {
        if let Some(layout) = &self.memo.lock().unwrap().layout {
            return Ok(layout.clone());
        }
        let layout = Arc::new(self.resolve_layout()?);
        let mut memo = self.memo.lock().unwrap();
        Ok(memo.layout.get_or_insert(layout).clone())
    }

    /// Two-phase offset propagation over this buffer: fixed fields keep
    /// their static offsets; each dependent array decodes its count and
    /// element-width siblings from the already-resolved prefix, binds
    /// `count * elem_width` as its width, and shifts every later field.
    fn resolve_layout(&self) -> Result<Layout> {
        let mut slots: Vec<Slot> = Vec::with_capacity(self.def.num_fields());
        let mut offset = 0usize;
        for spec in self.def.fields() {
            let slot = match spec.ty() {
                FieldType::DependentArray {
                    count_field,
                    width_field,
                    ..
                } => {
                    let count = self.sibling_uint(&slots, count_field)?;
                    let elem_width = self.sibling_uint(&slots, width_field)?;
                    // A span that overflows usize can never fit a buffer
                    let width = count
                        .checked_mul(elem_width)
                        .ok_or(DecodeError::InsufficientBuffer {
                            needed: usize::MAX,
                            available: self.buffer.len(),
                        })?;
                    tracing::trace!(
                        "resolved dependent field '{}': {} x {} bytes at offset {}",
                        spec.name(),
                        count,
                        elem_width,
                        offset
                    );
                    Slot {
                        offset,
                        width,
                        array: Some((count, elem_width)),
                    }
                }
                _ => Slot {
                    offset,
                    width: spec.width(),
                    array: None,
                },
            };
            offset = offset
                .checked_add(slot.width)
                .ok_or(DecodeError::InsufficientBuffer {
                    needed: usize::MAX,
                    available: self.buffer.len(),
                })?;
            slots.push(slot);
        }
        Ok(Layout {
            slots,
            total_width: offset,
        })
    }

    /// Decode an earlier sibling integer field during layout
    /// resolution. The sibling must be a uint field declared before
    /// the dependent field, so its slot is already final.
    fn sibling_uint(&self, slots: &[Slot], name: &str) -> Result<usize> {
        let idx = self.def.field_index(name)?;
        let spec = &self.def.fields()[idx];
        if !matches!(spec.ty(), FieldType::Uint) {
            return Err(DecodeError::UnsupportedFieldType(format!(
                "dependent dimension field '{}' is {}, not uint",
                name,
                spec.ty().type_name()
            )));
        }
        let slot = slots.get(idx).ok_or_else(|| {
            DecodeError::UnsupportedFieldType(format!(
                "dependent dimension field '{}' must be declared before the array",
                name
            ))
        })?;
        let bytes = self.buffer.get(self.span_start(slot.offset)?, slot.width)?;
        Ok(decode_uint(bytes)? as usize)
    }

    fn span_start(&self, offset: usize) -> Result<usize> {
        self.base
            .checked_add(offset)
            .ok_or(DecodeError::InsufficientBuffer {
                needed: usize::MAX,
                available: self.buffer.len(),
            })
    }

    fn decode_field(&self, idx: usize) -> Result<DecodedField> {
        let layout = self.layout()?;
        let slot = layout.slots[idx];
        let spec = &self.def.fields()[idx];
        let field_base = self.span_start(slot.offset)?;
        Ok(match spec.ty() {
            FieldType::Bytes => {
                DecodedField::Bytes(self.buffer.get(field_base, slot.width)?.to_vec())
            }
            FieldType::Uint => {
                DecodedField::Uint(decode_uint(self.buffer.get(field_base, slot.width)?)?)
            }
            FieldType::Text => {
                DecodedField::Text(decode_text(self.buffer.get(field_base, slot.width)?))
            }
            FieldType::Named { mapping_key } => {
                let code = decode_uint(self.buffer.get(field_base, slot.width)?)?;
                DecodedField::Named(NamedValue::new(mapping_key.clone(), code))
            }
            FieldType::Time => DecodedField::Time(decode_time(
                self.buffer.get(field_base, slot.width)?,
            )?),
            FieldType::Struct(def) => {
                // Children stay lazy; the nested view decodes on demand
                DecodedField::Struct(StructView::new(
                    self.buffer.clone(),
                    field_base,
                    def.clone(),
                ))
            }
            FieldType::DependentArray { elem, .. } => {
                let (count, elem_width) = slot.array.unwrap_or((0, 0));
                let data = self.buffer.get(field_base, slot.width)?.to_vec();
                DecodedField::Array(ArrayField::new(data, count, elem_width, *elem))
            }
        })
    }
}
