//! Command implementations

pub mod status;

pub use status::{handle_status_command, OutputOptions};
