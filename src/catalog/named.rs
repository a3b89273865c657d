// Named values: a raw code paired with a lazily resolved label

use crate::catalog::table::resolve_label;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// An integer code paired with a human-readable label.
///
/// The label is resolved from the active catalog on first access and
/// memoized (write-once). Equality and hashing use the code alone;
/// the label never factors in.
#[derive(Debug, Clone)]
pub struct NamedValue {
    code: u64,
    mapping_key: String,
    label: OnceLock<String>,
}

impl NamedValue {
    pub fn new(mapping_key: impl Into<String>, code: u64) -> Self {
        Self {
            code,
            mapping_key: mapping_key.into(),
            label: OnceLock::new(),
        }
    }

    pub fn code(&self) -> u64 {
        self.code
    }

    pub fn mapping_key(&self) -> &str {
        &self.mapping_key
    }

    /// Resolve the label through the active catalog, memoizing the
    /// result; never errors (unresolvable codes read "Unknown")
    pub fn label(&self) -> &str {
        self.label
            .get_or_init(|| resolve_label(&self.mapping_key, self.code))
    }
}

impl PartialEq for NamedValue {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for NamedValue {}

impl Hash for NamedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// Well-known command codes
pub mod command {
    pub const VEHICLE_LOGIN: u64 = 0x01;
    pub const REALTIME_DATA: u64 = 0x02;
    pub const REISSUE_DATA: u64 = 0x03;
    pub const VEHICLE_LOGOUT: u64 = 0x04;
    pub const PLATFORM_LOGIN: u64 = 0x05;
    pub const PLATFORM_LOGOUT: u64 = 0x06;
}

/// Well-known response codes
pub mod response_code {
    pub const SUCCESS: u64 = 0x01;
    pub const FAILURE: u64 = 0x02;
    pub const VIN_DUPLICATED: u64 = 0x03;
    pub const COMMAND: u64 = 0xFE;
}

/// Well-known encryption types
pub mod encryption {
    pub const NONE: u64 = 0x01;
    pub const RSA: u64 = 0x02;
    pub const AES128: u64 = 0x03;
    pub const ERROR: u64 = 0xFE;
    pub const NOT_VALID: u64 = 0xFF;
}
