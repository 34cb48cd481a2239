//! Persistence collaborator for the Switchboard event bus.
//!
//! The bus holds exactly one [`PersistentStore`] per instance and installs
//! the in-memory default lazily when nothing else was supplied. Durable
//! backends (SQL and friends) live behind the same trait.

pub mod memory;
pub mod store;

pub use memory::MemoryStoreAdapter;
pub use store::{PersistentStore, StoreError, StoreResult};
