//! Persisted user preferences and best score

pub mod preferences;
pub mod store;

pub use preferences::Preferences;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
