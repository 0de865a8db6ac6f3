//! Session record services
//!
//! This module contains the session record store interface, its in-process
//! and HTTP implementations, and the statistics computed over records.

pub mod http_store;
pub mod memory_store;
pub mod stats;
pub mod store;

// Re-export main types
pub use http_store::HttpSessionStore;
pub use memory_store::{InMemorySessionStore, SessionFilter};
pub use store::{SessionStore, StoreError};
