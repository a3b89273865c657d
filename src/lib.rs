// GB32960-RS: decoder for GB/T 32960 vehicle telematics frames
//
// Turns raw byte buffers from a transport connection into typed, named
// values: a generic binary-structure engine (ordered field schemas,
// automatic offset propagation, lazy views, value trees) plus the
// protocol-specific header, frame, and login-record definitions on top
// of it. Decode-only; checksum validation and socket lifecycles are
// the caller's business.

pub mod buffer;
pub mod catalog;
pub mod error;
pub mod frame;
pub mod records;
pub mod schema;

// Re-export commonly used types
pub use buffer::ByteBuffer;
pub use catalog::{
    active_catalog, default_catalog, resolve_label, set_active_catalog, Catalog, MappingTable,
    NamedValue,
};
pub use error::{DecodeError, Result};
pub use frame::{header_def, Frame, HEADER_LEN, MAGIC};
pub use records::{login_record, record_for, register_record, registered_commands};
pub use schema::{
    decode_text, decode_time, decode_uint, ArrayField, DecodedField, ElemKind, FieldSpec,
    FieldType, StructDef, StructDefBuilder, StructView, Value,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_full_frame_materializes_to_json() {
        let bytes = b"\x23\x23\x01\x01VIN1234567890ABCD\x01\x00\x00\x00".to_vec();
        let buf = ByteBuffer::new(bytes);
        let frame = Frame::parse(&buf, 0).unwrap();
        let tree = frame.header().materialize().unwrap();
        let json = serde_json::to_string(&tree).unwrap();
        assert!(json.contains("VIN1234567890ABCD"));
        assert!(json.contains("VehicleLogin"));
    }
}
