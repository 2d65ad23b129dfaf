pub mod kv_entry;
pub mod status;

// Re-export models for easier access
pub use kv_entry::*;
pub use status::*;
