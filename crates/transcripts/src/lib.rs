//! Transcript store implementations for FreightDesk.

pub mod file_store;

pub use file_store::FileStore;
