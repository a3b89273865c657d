// Wire frame parsing: [24B header][data_length B payload][1B check]

use crate::buffer::ByteBuffer;
use crate::catalog::{COMMAND_TEXT, ENCRYPTION_TYPE_TEXT, RESPONSE_CODE_TEXT};
use crate::error::{DecodeError, Result};
use crate::records::record_for;
use crate::schema::{StructDef, StructView};
use nom::{bytes::complete::take, IResult, Parser};
use std::sync::Arc;

/// Fixed header length in bytes
pub const HEADER_LEN: usize = 24;

/// The frame start marker, two '#' bytes. Exposed for callers; this
/// engine extracts it raw and never checks it.
pub const MAGIC: [u8; 2] = [0x23, 0x23];

lazy_static::lazy_static! {
    static ref HEADER_DEF: Arc<StructDef> = Arc::new(
        StructDef::builder()
            .bytes("magic", 2)
            .named("command", 1, COMMAND_TEXT)
            .named("response_code", 1, RESPONSE_CODE_TEXT)
            .text("vin", 17)
            .named("encryption_type", 1, ENCRYPTION_TYPE_TEXT)
            .uint("data_length", 2)
            .build()
    );
}

/// The shared 24-byte header structure definition
pub fn header_def() -> Arc<StructDef> {
    HEADER_DEF.clone()
}

/// Split the bytes after the header into payload and check byte
fn split_data(input: &[u8], data_length: usize) -> IResult<&[u8], (&[u8], u8)> {
    let (input, payload) = take(data_length).parse(input)?;
    let (input, check) = take(1usize).parse(input)?;
    Ok((input, (payload, check[0])))
}

/// One complete protocol message: a header view over the first 24
/// bytes, a payload of header-declared length, and one trailing check
/// byte. The check byte is parsed but never validated here; whether
/// and how to verify it is the caller's policy.
#[derive(Debug, Clone)]
pub struct Frame {
    buffer: ByteBuffer,
    base: usize,
    header: StructView,
    data_length: usize,
    check_byte: u8,
}

impl Frame {
    /// Parse a frame from @buffer starting at @offset.
    ///
    /// Fails with `InsufficientBuffer` when fewer than
    /// `24 + data_length + 1` bytes remain at @offset.
    pub fn parse(buffer: &ByteBuffer, offset: usize) -> Result<Frame> {
        let header = StructView::new(buffer.clone(), offset, header_def());
        let data_length = header.get_uint("data_length")? as usize;

        let after_header = buffer.get_from(offset + HEADER_LEN)?;
        let (_, (_, check_byte)) =
            split_data(after_header, data_length).map_err(|_| DecodeError::InsufficientBuffer {
                needed: offset + HEADER_LEN + data_length + 1,
                available: buffer.len(),
            })?;

        let command = header.get_named("command")?;
        tracing::debug!(
            "parsed frame at offset {}: command {:#04x}, {} payload bytes",
            offset,
            command.code(),
            data_length
        );

        Ok(Frame {
            buffer: buffer.clone(),
            base: offset,
            header,
            data_length,
            check_byte,
        })
    }

    /// The decoded header view
    pub fn header(&self) -> &StructView {
        &self.header
    }

    /// Payload length as declared by the header
    pub fn data_length(&self) -> usize {
        self.data_length
    }

    /// Raw payload bytes; command-specific decoding is up to the
    /// registered payload definitions (see `decode_payload`)
    pub fn payload(&self) -> &[u8] {
        // Span validated in parse
        let start = self.base + HEADER_LEN;
        &self.buffer.as_bytes()[start..start + self.data_length]
    }

    /// The trailing check byte, exposed raw and unvalidated
    pub fn check_byte(&self) -> u8 {
        self.check_byte
    }

    /// Total frame span in bytes: header + payload + check byte
    pub fn frame_len(&self) -> usize {
        HEADER_LEN + self.data_length + 1
    }

    /// Bind the registered payload definition for the header's command
    /// over this frame's payload bytes; `None` when no decoder is
    /// registered for the command.
    pub fn decode_payload(&self) -> Result<Option<StructView>> {
        let command = self.header.get_named("command")?;
        Ok(record_for(command.code()).map(|def| {
            StructView::new(self.buffer.clone(), self.base + HEADER_LEN, def)
        }))
    }
}
