//! Storage module for ledger persistence

pub mod persistence;

pub use persistence::{
    load_from_file, save_to_file, LedgerSnapshot, Storage, StorageConfig, StorageError,
    StorageStats, FORMAT_VERSION,
};
