// Protocol frame assembly: header + payload + trailing check byte

pub mod wire;

pub use wire::{header_def, Frame, HEADER_LEN, MAGIC};
