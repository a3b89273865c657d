// Structure definitions: ordered fields with propagated byte offsets

use crate::error::{DecodeError, Result};
use crate::schema::field::{ElemKind, FieldSpec, FieldType};
use crate::schema::time::TIME_FIELD_WIDTH;
use std::sync::Arc;

/// An ordered schema of named fields over a byte span.
///
/// Declaration order is semantically significant: it determines every
/// field's offset. Fields live in a `Vec`, never in an associative
/// container, so no iteration-order guarantee is ever relied on.
/// Definitions are immutable after `build`; dependent widths are
/// resolved per decode in the view's layout table, not here.
#[derive(Debug)]
pub struct StructDef {
    fields: Vec<FieldSpec>,
    total_width: usize,
}

impl StructDef {
    /// Start declaring a structure
    pub fn builder() -> StructDefBuilder {
        StructDefBuilder::new()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Number of declared fields
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    /// Sum of static field widths (the structure's minimum byte span;
    /// dependent-length placeholders contribute zero)
    pub fn total_width(&self) -> usize {
        self.total_width
    }

    /// Index of the field called @name
    pub fn field_index(&self, name: &str) -> Result<usize> {
        self.fields
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| DecodeError::UnknownField(name.to_string()))
    }

    /// The field called @name
    pub fn field(&self, name: &str) -> Result<&FieldSpec> {
        let idx = self.field_index(name)?;
        Ok(&self.fields[idx])
    }
}

/// Builder recording fields in declaration order.
///
/// `build` runs offset propagation: a running counter assigns each
/// field's offset and advances by its width, nested structures
/// contributing their own total width.
#[derive(Debug, Default)]
pub struct StructDefBuilder {
    fields: Vec<FieldSpec>,
}

impl StructDefBuilder {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare a raw-bytes field of @width bytes
    pub fn bytes(mut self, name: &str, width: usize) -> Self {
        self.fields.push(FieldSpec::new(name, width, FieldType::Bytes));
        self
    }

    /// Declare a big-endian unsigned integer field of @width bytes
    pub fn uint(mut self, name: &str, width: usize) -> Self {
        self.fields.push(FieldSpec::new(name, width, FieldType::Uint));
        self
    }

    /// Declare a NUL-truncated text field of @width bytes
    pub fn text(mut self, name: &str, width: usize) -> Self {
        self.fields.push(FieldSpec::new(name, width, FieldType::Text));
        self
    }

    /// Declare a named-value field resolved through @mapping_key
    pub fn named(mut self, name: &str, width: usize, mapping_key: &str) -> Self {
        self.fields.push(FieldSpec::new(
            name,
            width,
            FieldType::Named {
                mapping_key: mapping_key.to_string(),
            },
        ));
        self
    }

    /// Declare a six-byte calendar timestamp field (fixed UTC+8)
    pub fn time(mut self, name: &str) -> Self {
        self.fields
            .push(FieldSpec::new(name, TIME_FIELD_WIDTH, FieldType::Time));
        self
    }

    /// Declare a nested structure field
    pub fn nested(mut self, name: &str, def: Arc<StructDef>) -> Self {
        let width = def.total_width();
        self.fields
            .push(FieldSpec::new(name, width, FieldType::Struct(def)));
        self
    }

    /// Declare a dependent-length array of `count * width` bytes, where
    /// @count_field and @width_field name earlier sibling integer fields
    pub fn dependent_array(
        mut self,
        name: &str,
        count_field: &str,
        width_field: &str,
        elem: ElemKind,
    ) -> Self {
        self.fields.push(FieldSpec::new(
            name,
            0,
            FieldType::DependentArray {
                count_field: count_field.to_string(),
                width_field: width_field.to_string(),
                elem,
            },
        ));
        self
    }

    /// Run offset propagation and freeze the definition
    pub fn build(self) -> StructDef {
        let mut fields = self.fields;
        let mut offset = 0usize;
        for field in fields.iter_mut() {
            field.set_offset(offset);
            offset += field.width();
        }
        tracing::trace!(
            "built struct definition: {} fields, {} bytes static width",
            fields.len(),
            offset
        );
        StructDef {
            fields,
            total_width: offset,
        }
    }
}
