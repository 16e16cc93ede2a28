// Storage module - PERSISTENCE
// Handles persistent snapshot storage using sled

mod store;

pub use store::{LedgerStore, StorageStats, StoreError};
