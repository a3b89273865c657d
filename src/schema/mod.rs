// Generic binary-structure decoding engine
// Declares named fields over a shared buffer, computes offsets, and
// exposes decoded values lazily or as a materialized value tree

pub mod field;
pub mod structure;
pub mod time;
pub mod value;
pub mod view;

pub use field::{decode_text, decode_uint, ArrayField, DecodedField, ElemKind, FieldSpec, FieldType};
pub use structure::{StructDef, StructDefBuilder};
pub use time::{beijing_offset, decode_time, TIME_FIELD_WIDTH};
pub use value::Value;
pub use view::StructView;
