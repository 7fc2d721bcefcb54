pub mod block_monitor;
pub mod rpc_client;

pub use block_monitor::{BlockMonitor, BlockMonitorConfig, MonitorStatus};
pub use rpc_client::{Block, RpcClient, Transaction, TransactionRequest};

use async_trait::async_trait;

use crate::error::{ConfigError, RpcError};

/// Capability interface over the ledger.
///
/// Everything the relay needs from the chain: head discovery, full blocks,
/// nonce and fee lookups, and broadcast. [`RpcClient`] implements it over
/// Ethereum JSON-RPC; tests substitute in-memory fakes.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Highest block height the node currently reports.
    async fn latest_block_number(&self) -> Result<u64, RpcError>;

    /// Fetch a block with full transaction bodies, not just hashes.
    async fn block_by_number(&self, block_number: u64) -> Result<Block, RpcError>;

    /// Pending transaction count for an account, used as the next nonce.
    async fn pending_nonce(&self, address: &str) -> Result<u64, RpcError>;

    /// Current network suggested gas price in wei.
    async fn gas_price(&self) -> Result<u128, RpcError>;

    /// Submit a transaction for signing and broadcast, returning its hash.
    async fn send_transaction(&self, request: &TransactionRequest) -> Result<String, RpcError>;
}

/// Normalize an address to lowercase without the `0x` prefix.
pub fn normalize_address(address: &str) -> String {
    let addr = address.trim();
    if addr.starts_with("0x") || addr.starts_with("0X") {
        addr[2..].to_lowercase()
    } else {
        addr.to_lowercase()
    }
}

/// Validate that an address is 20 hex-encoded bytes.
pub fn validate_address(address: &str) -> Result<(), ConfigError> {
    let normalized = normalize_address(address);

    if normalized.len() != 40 {
        return Err(ConfigError::InvalidAddress(format!(
            "address must be 40 hex characters, got {}",
            normalized.len()
        )));
    }

    if !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidAddress(
            "address contains non-hexadecimal characters".to_string(),
        ));
    }

    Ok(())
}
