// Read-only byte buffer shared between structure views
// Decoding never mutates a buffer; views hold cheap clones of it

use crate::error::{DecodeError, Result};
use std::sync::Arc;

/// Immutable byte storage with bounds-checked slice access.
///
/// Clones share the underlying bytes, so a buffer outlives every
/// `StructView` bound to it without the caller tracking lifetimes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Arc<[u8]>,
}

impl ByteBuffer {
    /// Create a new buffer from owned bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { data: data.into() }
    }

    /// Get the size of the buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a chunk of bytes from @start for @len bytes
    pub fn get(&self, start: usize, len: usize) -> Result<&[u8]> {
        // A span that overflows usize can never fit
        let end = start
            .checked_add(len)
            .ok_or(DecodeError::InsufficientBuffer {
                needed: usize::MAX,
                available: self.data.len(),
            })?;
        if end > self.data.len() {
            return Err(DecodeError::InsufficientBuffer {
                needed: end,
                available: self.data.len(),
            });
        }
        Ok(&self.data[start..end])
    }

    /// Get all bytes from @start to the end of the buffer
    pub fn get_from(&self, start: usize) -> Result<&[u8]> {
        if start > self.data.len() {
            return Err(DecodeError::InsufficientBuffer {
                needed: start,
                available: self.data.len(),
            });
        }
        Ok(&self.data[start..])
    }

    /// Get the entire buffer as raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
