//! Ledger construction parameters
//!
//! Loaded from JSON, e.g.
//!
//! ```json
//! {
//!   "name": "My Token",
//!   "symbol": "MTK",
//!   "decimals": 18,
//!   "minter": "0x00000000000000000000000000000000000000a1",
//!   "initial_holder": "0x00000000000000000000000000000000000000a1",
//!   "initial_supply": 1000000
//! }
//! ```

use crate::ledger::{Address, LedgerCore, LedgerError, MintPolicy, TokenMetadata};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Initial supply of {0} needs an initial holder")]
    MissingInitialHolder(u128),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

fn default_decimals() -> u8 {
    18
}

/// Everything needed to create a fresh ledger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerConfig {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Restrict minting to this address; anyone may mint when unset
    #[serde(default)]
    pub minter: Option<Address>,
    #[serde(default)]
    pub initial_holder: Option<Address>,
    #[serde(default)]
    pub initial_supply: u128,
}

impl LedgerConfig {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: default_decimals(),
            minter: None,
            initial_holder: None,
            initial_supply: 0,
        }
    }

    /// Read a JSON config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn mint_policy(&self) -> MintPolicy {
        match self.minter {
            Some(minter) => MintPolicy::Minter(minter),
            None => MintPolicy::Open,
        }
    }

    /// Validate and build the ledger, minting the initial supply if any
    pub fn build(&self) -> Result<LedgerCore, ConfigError> {
        let metadata = TokenMetadata::new(self.name.clone(), self.symbol.clone(), self.decimals)?;

        let ledger = match (self.initial_holder, self.initial_supply) {
            (Some(holder), amount) => {
                LedgerCore::with_initial_mint(metadata, self.mint_policy(), holder, amount)?
            }
            (None, 0) => LedgerCore::new(metadata, self.mint_policy()),
            (None, amount) => return Err(ConfigError::MissingInitialHolder(amount)),
        };

        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let config: LedgerConfig =
            serde_json::from_str(r#"{"name": "Plain", "symbol": "PLN"}"#).unwrap();

        assert_eq!(config, LedgerConfig::new("Plain", "PLN"));
        assert_eq!(config.mint_policy(), MintPolicy::Open);

        let ledger = config.build().unwrap();
        assert_eq!(ledger.decimals(), 18);
        assert_eq!(ledger.total_supply(), 0);
    }

    #[test]
    fn test_build_with_initial_supply() {
        let holder: Address = "0x00000000000000000000000000000000000000a1".parse().unwrap();
        let config = LedgerConfig {
            minter: Some(holder),
            initial_holder: Some(holder),
            initial_supply: 1_000_000,
            ..LedgerConfig::new("Seeded", "SEED")
        };

        let ledger = config.build().unwrap();
        assert_eq!(ledger.balance_of(holder), 1_000_000);
        assert_eq!(ledger.mint_policy(), MintPolicy::Minter(holder));
    }

    #[test]
    fn test_supply_without_holder_rejected() {
        let config = LedgerConfig {
            initial_supply: 5,
            ..LedgerConfig::new("Orphan", "ORP")
        };

        assert!(matches!(
            config.build(),
            Err(ConfigError::MissingInitialHolder(5))
        ));
    }

    #[test]
    fn test_invalid_metadata_rejected() {
        let config = LedgerConfig::new("", "BAD");
        assert!(matches!(
            config.build(),
            Err(ConfigError::Ledger(LedgerError::InvalidName))
        ));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("ledger.config.json");
        fs::write(&path, r#"{"name": "File", "symbol": "FIL", "decimals": 6}"#).unwrap();

        let config = LedgerConfig::from_file(&path).unwrap();
        assert_eq!(config.decimals, 6);
        assert!(LedgerConfig::from_file(&temp_dir.path().join("missing.json")).is_err());
    }
}
