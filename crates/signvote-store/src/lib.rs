//! Signature record storage.
//!
//! Records are insert-only. Every backend enforces uniqueness of the
//! `device_uuid` and `device_fingerprint` columns at insert time, so two
//! concurrent submissions from the same device cannot both be stored.

mod error;
mod file;
mod memory;
mod store;
mod types;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::SignatureStore;
pub use types::*;
