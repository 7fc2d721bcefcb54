use serde::{Deserialize, Serialize};

use crate::chain::{normalize_address, validate_address};
use crate::error::ConfigError;

/// The operator's on-chain identity.
///
/// Constructed once at startup and read-only afterwards. The signing
/// capability for this address lives in the ledger node; the process only
/// ever references the address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub address: String,
}

impl Account {
    pub fn new(address: &str) -> Result<Self, ConfigError> {
        validate_address(address)?;
        Ok(Self {
            address: address.to_string(),
        })
    }

    /// Lowercase address without the `0x` prefix, for case-insensitive
    /// destination comparison.
    pub fn normalized(&self) -> String {
        normalize_address(&self.address)
    }
}
