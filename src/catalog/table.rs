// Read-only label tables with exact and range-keyed entries

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Mapping key for command labels
pub const COMMAND_TEXT: &str = "command_value_text";
/// Mapping key for response-code labels
pub const RESPONSE_CODE_TEXT: &str = "response_code_value_text";
/// Mapping key for encryption-type labels
pub const ENCRYPTION_TYPE_TEXT: &str = "encryption_type_value_text";

/// Label returned when no entry or range matches a code
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One lookup table: exact code entries plus closed `[low, high]`
/// range entries kept in declaration order.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    exact: HashMap<u64, String>,
    ranges: Vec<(u64, u64, String)>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact code entry
    pub fn entry(mut self, code: u64, label: &str) -> Self {
        self.exact.insert(code, label.to_string());
        self
    }

    /// Add a closed range entry covering `low..=high`
    pub fn range(mut self, low: u64, high: u64, label: &str) -> Self {
        self.ranges.push((low, high, label.to_string()));
        self
    }

    /// Exact-match lookup only, no range fallback
    pub fn lookup(&self, code: u64) -> Option<&str> {
        self.exact.get(&code).map(String::as_str)
    }

    /// Resolve @code to a label: exact match first, then the narrowest
    /// containing range (later-declared entry wins equal-width ties),
    /// then the literal "Unknown".
    pub fn resolve(&self, code: u64) -> String {
        if let Some(label) = self.exact.get(&code) {
            return label.clone();
        }
        let mut best: Option<(u64, &str)> = None;
        for (low, high, label) in &self.ranges {
            if *low <= code && code <= *high {
                let span = high - low;
                match best {
                    Some((best_span, _)) if span > best_span => {}
                    _ => best = Some((span, label)),
                }
            }
        }
        match best {
            Some((_, label)) => label.to_string(),
            None => {
                tracing::debug!("no label for code {:#04x}, degrading to Unknown", code);
                UNKNOWN_LABEL.to_string()
            }
        }
    }
}

/// A set of mapping tables keyed by mapping key
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: HashMap<String, MappingTable>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the table for @mapping_key
    pub fn with_table(mut self, mapping_key: &str, table: MappingTable) -> Self {
        self.tables.insert(mapping_key.to_string(), table);
        self
    }

    pub fn table(&self, mapping_key: &str) -> Option<&MappingTable> {
        self.tables.get(mapping_key)
    }

    /// Resolve a code through the table for @mapping_key; a missing
    /// table degrades to "Unknown" like an unmatched code
    pub fn resolve(&self, mapping_key: &str, code: u64) -> String {
        match self.tables.get(mapping_key) {
            Some(table) => table.resolve(code),
            None => {
                tracing::debug!("no mapping table '{}', degrading to Unknown", mapping_key);
                UNKNOWN_LABEL.to_string()
            }
        }
    }
}

/// The default (English) catalog
pub fn default_catalog() -> Catalog {
    Catalog::new()
        .with_table(
            COMMAND_TEXT,
            MappingTable::new()
                .entry(0x01, "VehicleLogin")
                .entry(0x02, "RealtimeData")
                .entry(0x03, "ReissueData")
                .entry(0x04, "VehicleLogout")
                .entry(0x05, "PlatformLogin")
                .entry(0x06, "PlatformLogout")
                .range(0x07, 0x08, "Terminal Data Reserved")
                .range(0x09, 0x7F, "Upstream Data Reserved")
                .range(0x80, 0x82, "Terminal Data Reserved")
                .range(0x83, 0xBF, "Downstream Data Reserved")
                .range(0xC0, 0xFE, "Customized"),
        )
        .with_table(
            RESPONSE_CODE_TEXT,
            MappingTable::new()
                .entry(0x01, "Success")
                .entry(0x02, "Failure")
                .entry(0x03, "VIN Duplicated")
                .entry(0xFE, "Command"),
        )
        .with_table(
            ENCRYPTION_TYPE_TEXT,
            MappingTable::new()
                .entry(0x01, "None")
                .entry(0x02, "RSA")
                .entry(0x03, "AES128")
                .entry(0xFE, "Error")
                .entry(0xFF, "Not Valid"),
        )
}

lazy_static::lazy_static! {
    /// Process-wide active catalog, selected once at startup
    static ref ACTIVE_CATALOG: RwLock<Arc<Catalog>> = RwLock::new(Arc::new(default_catalog()));
}

/// The currently active catalog
pub fn active_catalog() -> Arc<Catalog> {
    ACTIVE_CATALOG.read().unwrap().clone()
}

/// Inject a locale-specific catalog; intended to be called once at
/// startup, before any labels have been resolved
pub fn set_active_catalog(catalog: Arc<Catalog>) {
    *ACTIVE_CATALOG.write().unwrap() = catalog;
}

/// Resolve a label through the active catalog; never errors
pub fn resolve_label(mapping_key: &str, code: u64) -> String {
    active_catalog().resolve(mapping_key, code)
}
