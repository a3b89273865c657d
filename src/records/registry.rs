// Registry mapping command codes to payload structure definitions
// This is the contract command-specific decoders plug into

use crate::catalog::command;
use crate::records::login::login_record;
use crate::schema::StructDef;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

lazy_static::lazy_static! {
    static ref RECORD_REGISTRY: Mutex<HashMap<u64, Arc<StructDef>>> =
        Mutex::new(builtin_records());
}

fn builtin_records() -> HashMap<u64, Arc<StructDef>> {
    let mut records = HashMap::new();
    records.insert(command::VEHICLE_LOGIN, login_record());
    records
}

/// Register a payload definition for @command_code, replacing any
/// existing registration
pub fn register_record(command_code: u64, def: Arc<StructDef>) {
    tracing::debug!("registering payload record for command {:#04x}", command_code);
    RECORD_REGISTRY.lock().unwrap().insert(command_code, def);
}

/// The payload definition registered for @command_code, if any
pub fn record_for(command_code: u64) -> Option<Arc<StructDef>> {
    RECORD_REGISTRY.lock().unwrap().get(&command_code).cloned()
}

/// Command codes with a registered payload definition, sorted
pub fn registered_commands() -> Vec<u64> {
    let mut codes: Vec<u64> = RECORD_REGISTRY.lock().unwrap().keys().copied().collect();
    codes.sort_unstable();
    codes
}
