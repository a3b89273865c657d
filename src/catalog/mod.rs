// Label catalog: maps raw numeric codes to human-readable text

pub mod named;
pub mod table;

pub use named::{command, encryption, response_code, NamedValue};
pub use table::{
    active_catalog, default_catalog, resolve_label, set_active_catalog, Catalog, MappingTable,
    COMMAND_TEXT, ENCRYPTION_TYPE_TEXT, RESPONSE_CODE_TEXT,
};
