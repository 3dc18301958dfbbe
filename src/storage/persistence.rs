//! Ledger persistence layer
//!
//! Saves the balance table, allowance table and total supply as a JSON
//! snapshot. Loading re-checks the ledger invariants before handing the
//! ledger back.

use crate::ledger::LedgerCore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Snapshot layout version written by this build
pub const FORMAT_VERSION: u32 = 1;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub ledger_file: String,
    pub backup_enabled: bool,
    pub max_backups: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".ledger_data"),
            ledger_file: "ledger.json".to_string(),
            backup_enabled: true,
            max_backups: 5,
        }
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    format_version: u32,
    saved_at: DateTime<Utc>,
    ledger: &'a LedgerCore,
}

/// A ledger read back from disk
#[derive(Debug, Deserialize)]
pub struct LedgerSnapshot {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
    pub ledger: LedgerCore,
}

impl LedgerSnapshot {
    /// Reject snapshots this build cannot trust
    fn validate(self) -> Result<Self, StorageError> {
        if self.format_version != FORMAT_VERSION {
            return Err(StorageError::InvalidData(format!(
                "Unsupported snapshot version {}",
                self.format_version
            )));
        }

        self.ledger
            .validate_invariants()
            .map_err(|e| StorageError::InvalidData(e.to_string()))?;

        Ok(self)
    }
}

fn write_snapshot(ledger: &LedgerCore, path: &Path) -> Result<(), StorageError> {
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    let snapshot = SnapshotRef {
        format_version: FORMAT_VERSION,
        saved_at: Utc::now(),
        ledger,
    };
    serde_json::to_writer_pretty(writer, &snapshot)?;
    Ok(())
}

fn read_snapshot(path: &Path) -> Result<LedgerSnapshot, StorageError> {
    let file = fs::File::open(path)?;
    let reader = BufReader::new(file);
    let snapshot: LedgerSnapshot = serde_json::from_reader(reader)?;
    snapshot.validate()
}

/// Ledger storage manager
pub struct Storage {
    config: StorageConfig,
}

impl Storage {
    /// Create a new storage manager
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        fs::create_dir_all(&config.data_dir)?;
        Ok(Self { config })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Result<Self, StorageError> {
        Self::new(StorageConfig::default())
    }

    fn ledger_path(&self) -> PathBuf {
        self.config.data_dir.join(&self.config.ledger_file)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        self.config
            .data_dir
            .join(format!("{}.backup.{}", self.config.ledger_file, index))
    }

    /// Save the ledger to disk
    pub fn save(&self, ledger: &LedgerCore) -> Result<(), StorageError> {
        let path = self.ledger_path();

        if self.config.backup_enabled && self.config.max_backups > 0 && path.exists() {
            self.rotate_backups()?;
            fs::copy(&path, self.backup_path(0))?;
        }

        // Write to temporary file first, then rename over the old snapshot
        let temp_path = self
            .config
            .data_dir
            .join(format!("{}.tmp", self.config.ledger_file));
        write_snapshot(ledger, &temp_path)?;
        fs::rename(&temp_path, &path)?;

        log::info!(
            "Saved ledger snapshot: {} holders, supply {}",
            ledger.holder_count(),
            ledger.total_supply()
        );
        Ok(())
    }

    /// Load the ledger from disk
    pub fn load(&self) -> Result<LedgerCore, StorageError> {
        let path = self.ledger_path();

        if !path.exists() {
            return Err(StorageError::InvalidData(
                "Ledger file not found".to_string(),
            ));
        }

        Ok(read_snapshot(&path)?.ledger)
    }

    /// Check if a saved ledger exists
    pub fn exists(&self) -> bool {
        self.ledger_path().exists()
    }

    /// Delete the saved ledger
    pub fn delete(&self) -> Result<(), StorageError> {
        let path = self.ledger_path();
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn rotate_backups(&self) -> Result<(), StorageError> {
        // Delete oldest backup
        let oldest = self.backup_path(self.config.max_backups - 1);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }

        // Shift existing backups
        for i in (0..self.config.max_backups - 1).rev() {
            let current = self.backup_path(i);
            if current.exists() {
                fs::rename(&current, self.backup_path(i + 1))?;
            }
        }

        Ok(())
    }

    /// Restore from a backup (0 is the most recent)
    pub fn restore_backup(&self, backup_index: usize) -> Result<LedgerCore, StorageError> {
        let backup_path = self.backup_path(backup_index);

        if !backup_path.exists() {
            return Err(StorageError::InvalidData(format!(
                "Backup {} not found",
                backup_index
            )));
        }

        Ok(read_snapshot(&backup_path)?.ledger)
    }

    /// List available backups
    pub fn list_backups(&self) -> Vec<usize> {
        (0..self.config.max_backups)
            .filter(|i| self.backup_path(*i).exists())
            .collect()
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StorageError> {
        let path = self.ledger_path();

        let file_size = if path.exists() {
            fs::metadata(&path)?.len()
        } else {
            0
        };

        Ok(StorageStats {
            file_size,
            backup_count: self.list_backups().len(),
            data_dir: self.config.data_dir.clone(),
        })
    }
}

/// Storage statistics
#[derive(Debug)]
pub struct StorageStats {
    pub file_size: u64,
    pub backup_count: usize,
    pub data_dir: PathBuf,
}

/// Save ledger to a specific file path
pub fn save_to_file(ledger: &LedgerCore, path: &Path) -> Result<(), StorageError> {
    write_snapshot(ledger, path)
}

/// Load ledger from a specific file path
pub fn load_from_file(path: &Path) -> Result<LedgerCore, StorageError> {
    Ok(read_snapshot(path)?.ledger)
}
