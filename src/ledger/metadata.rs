//! Token metadata

use super::error::LedgerError;
use serde::{Deserialize, Serialize};

/// Descriptive token fields, fixed at creation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Token name (e.g., "My Token")
    pub name: String,
    /// Token symbol (e.g., "MTK")
    pub symbol: String,
    /// Decimal places (usually 18)
    pub decimals: u8,
}

impl TokenMetadata {
    /// Create new token metadata with validation
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
    ) -> Result<Self, LedgerError> {
        let name = name.into();
        let symbol = symbol.into();

        if name.is_empty() || name.chars().count() > 50 {
            return Err(LedgerError::InvalidName);
        }

        if symbol.is_empty() || symbol.chars().count() > 10 {
            return Err(LedgerError::InvalidSymbol);
        }

        if decimals > 18 {
            return Err(LedgerError::InvalidDecimals);
        }

        Ok(Self {
            name,
            symbol,
            decimals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_validation() {
        assert!(TokenMetadata::new("Test Token", "TST", 18).is_ok());
        assert!(TokenMetadata::new("Zero", "Z", 0).is_ok());

        assert_eq!(TokenMetadata::new("", "TST", 18), Err(LedgerError::InvalidName));
        assert_eq!(
            TokenMetadata::new("x".repeat(51), "TST", 18),
            Err(LedgerError::InvalidName)
        );
        assert_eq!(
            TokenMetadata::new("Test", "TOOLONGSYMBOL", 18),
            Err(LedgerError::InvalidSymbol)
        );
        assert_eq!(
            TokenMetadata::new("Test", "TST", 19),
            Err(LedgerError::InvalidDecimals)
        );
    }
}
