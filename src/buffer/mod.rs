// Shared read-only byte storage for decode operations

pub mod byte_buffer;

pub use byte_buffer::ByteBuffer;
