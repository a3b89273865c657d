// Vehicle login payload: the one record with a dependent-length field

use crate::schema::{ElemKind, StructDef};
use std::sync::Arc;

lazy_static::lazy_static! {
    static ref LOGIN_DEF: Arc<StructDef> = Arc::new(
        StructDef::builder()
            .time("collect_time")
            .uint("login_serial", 2)
            .text("iccid", 20)
            .uint("battery_count", 1)
            .uint("battery_code_length", 1)
            // battery_count codes of battery_code_length bytes each
            .dependent_array(
                "battery_codes",
                "battery_count",
                "battery_code_length",
                ElemKind::Text,
            )
            .build()
    );
}

/// The vehicle login record definition (command 0x01)
pub fn login_record() -> Arc<StructDef> {
    LOGIN_DEF.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ByteBuffer;
    use crate::error::DecodeError;
    use crate::frame::Frame;
    use crate::schema::{StructView, Value};
    use chrono::{Datelike, Timelike};

    fn login_payload() -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&[0x17, 0x05, 0x0C, 0x08, 0x1E, 0x00]); // 2023-05-12 08:30:00
        payload.extend_from_slice(&[0x00, 0x2A]); // login_serial = 42
        payload.extend_from_slice(b"89860012345678901234");
        payload.push(0x02); // battery_count
        payload.push(0x03); // battery_code_length
        payload.extend_from_slice(b"PK1PK2");
        payload
    }

    #[test]
    fn test_login_static_layout() {
        let def = login_record();
        assert_eq!(def.total_width(), 30);
        assert_eq!(def.field("battery_codes").unwrap().offset(), 30);
    }

    #[test]
    fn test_login_record_decode() {
        let buf = ByteBuffer::new(login_payload());
        let view = StructView::new(buf, 0, login_record());

        let t = view.get_time("collect_time").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2023, 5, 12));
        assert_eq!((t.hour(), t.minute(), t.second()), (8, 30, 0));

        assert_eq!(view.get_uint("login_serial").unwrap(), 42);
        assert_eq!(view.get_text("iccid").unwrap(), "89860012345678901234");
        assert_eq!(view.get_uint("battery_count").unwrap(), 2);

        assert_eq!(view.array_len("battery_codes").unwrap(), 2);
        assert_eq!(
            view.array_element("battery_codes", 0)
                .unwrap()
                .into_value()
                .unwrap(),
            Value::Text("PK1".to_string())
        );
        assert!(matches!(
            view.array_element("battery_codes", 5),
            Err(DecodeError::IndexOutOfRange { index: 5, count: 2 })
        ));
        assert_eq!(view.resolved_width().unwrap(), 36);
    }

    #[test]
    fn test_login_frame_end_to_end() {
        let payload = login_payload();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0x23, 0x23, 0x01, 0x01]);
        bytes.extend_from_slice(b"VIN1234567890ABCD");
        bytes.push(0x01);
        bytes.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&payload);
        bytes.push(0x7C); // check byte, carried but not verified

        let buf = ByteBuffer::new(bytes);
        let frame = Frame::parse(&buf, 0).unwrap();
        assert_eq!(frame.check_byte(), 0x7C);

        let record = frame.decode_payload().unwrap().unwrap();
        assert_eq!(record.get_text("iccid").unwrap(), "89860012345678901234");
        assert_eq!(record.array_len("battery_codes").unwrap(), 2);

        let tree = record.materialize().unwrap();
        assert_eq!(
            tree.get("battery_codes"),
            Some(&Value::Array(vec![
                Value::Text("PK1".to_string()),
                Value::Text("PK2".to_string()),
            ]))
        );
        // Materialization is idempotent
        assert_eq!(tree, record.materialize().unwrap());
    }

    #[test]
    fn test_login_payload_truncated_battery_codes() {
        let mut payload = login_payload();
        payload.truncate(payload.len() - 1); // one code byte short
        let buf = ByteBuffer::new(payload);
        let view = StructView::new(buf, 0, login_record());
        assert_eq!(view.get_uint("battery_count").unwrap(), 2);
        assert!(matches!(
            view.get("battery_codes"),
            Err(DecodeError::InsufficientBuffer { .. })
        ));
    }
}
