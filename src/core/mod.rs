// Internal modules - not part of public API
pub(crate) mod config;
pub(crate) mod discovery;
pub(crate) mod error;
pub(crate) mod filter;
pub(crate) mod probe;
pub(crate) mod report;
pub(crate) mod runner;
pub(crate) mod stats;


// Public API - curated exports only
pub mod api;

// Re-export key items at module level for convenience
pub use api::*;
