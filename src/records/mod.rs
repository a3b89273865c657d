// Command-specific payload structure definitions

pub mod login;
pub mod registry;

pub use login::login_record;
pub use registry::{record_for, register_record, registered_commands};
