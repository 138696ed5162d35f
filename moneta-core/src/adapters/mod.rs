//! Adapter implementations
//!
//! Adapters implement port traits with concrete I/O. The JSON file store
//! is the production adapter; the in-memory store backs tests.

mod json_store;
mod memory;

pub use json_store::JsonCredentialStore;
pub use memory::MemoryCredentialStore;
