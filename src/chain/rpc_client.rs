use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::chain::Ledger;
use crate::error::RpcError;
use crate::logging::MetricsLogger;

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Vec<Value>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<Value>,
    error: Option<JsonRpcError>,
    #[allow(dead_code)]
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// A block with full transaction bodies.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Block {
    pub number: String,
    pub hash: Option<String>,
    pub timestamp: String,
    pub transactions: Vec<Transaction>,
}

/// A transaction as returned by `eth_getBlockByNumber` with full bodies.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value: String,
    /// Payload bytes as a hex string. `"0x"` is the canonical no-data sentinel.
    #[serde(default)]
    pub input: Option<String>,
}

/// An outbound transaction prior to signing and broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    pub from: String,
    pub to: String,
    pub value: u128,
    pub gas: u64,
    pub gas_price: u128,
    pub nonce: u64,
    pub data: String,
}

impl TransactionRequest {
    /// JSON-RPC parameter object with quantities hex-encoded.
    pub fn to_rpc_params(&self) -> Value {
        json!({
            "from": self.from,
            "to": self.to,
            "value": format!("0x{:x}", self.value),
            "gas": format!("0x{:x}", self.gas),
            "gasPrice": format!("0x{:x}", self.gas_price),
            "nonce": format!("0x{:x}", self.nonce),
            "data": self.data,
        })
    }
}

/// Ethereum JSON-RPC client for the ledger capability.
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
    timeout_seconds: u64,
}

impl RpcClient {
    pub fn new(endpoint: String) -> Self {
        Self::new_with_config(endpoint, 30)
    }

    pub fn new_with_config(endpoint: String, timeout_seconds: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_seconds))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint,
            timeout_seconds,
        }
    }

    async fn make_request(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Timeout {
                        seconds: self.timeout_seconds,
                    }
                } else if e.is_connect() {
                    RpcError::Connection(e.to_string())
                } else {
                    RpcError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            MetricsLogger::log_rpc_call(method, started.elapsed().as_millis() as u64, false);
            return Err(RpcError::Connection(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let rpc_response: JsonRpcResponse = response.json().await.map_err(RpcError::Http)?;
        MetricsLogger::log_rpc_call(method, started.elapsed().as_millis() as u64, rpc_response.error.is_none());

        if let Some(error) = rpc_response.error {
            return Err(RpcError::Method {
                code: error.code,
                message: error.message,
            });
        }

        // JSON-RPC permits a literal null result (e.g. an unknown block);
        // callers decide whether null is meaningful for their method.
        Ok(rpc_response.result.unwrap_or(Value::Null))
    }

    async fn request_quantity(&self, method: &str, params: Vec<Value>) -> Result<u128, RpcError> {
        let result = self.make_request(method, params).await?;
        let hex_string = result
            .as_str()
            .ok_or_else(|| RpcError::InvalidResponse(format!("{} result is not a string", method)))?;
        parse_hex_to_u128(hex_string)
    }

    /// Operator balance in wei, logged once at startup.
    pub async fn get_balance(&self, address: &str) -> Result<u128, RpcError> {
        self.request_quantity(
            "eth_getBalance",
            vec![json!(address), json!("latest")],
        )
        .await
    }
}

#[async_trait]
impl Ledger for RpcClient {
    async fn latest_block_number(&self) -> Result<u64, RpcError> {
        let quantity = self.request_quantity("eth_blockNumber", vec![]).await?;
        Ok(quantity as u64)
    }

    async fn block_by_number(&self, block_number: u64) -> Result<Block, RpcError> {
        let params = vec![
            json!(format!("0x{:x}", block_number)),
            json!(true), // Include full transaction objects
        ];

        let result = self.make_request("eth_getBlockByNumber", params).await?;
        if result.is_null() {
            return Err(RpcError::BlockNotFound { block_number });
        }

        serde_json::from_value(result).map_err(RpcError::Json)
    }

    async fn pending_nonce(&self, address: &str) -> Result<u64, RpcError> {
        let quantity = self
            .request_quantity(
                "eth_getTransactionCount",
                vec![json!(address), json!("pending")],
            )
            .await?;
        Ok(quantity as u64)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        self.request_quantity("eth_gasPrice", vec![]).await
    }

    async fn send_transaction(&self, request: &TransactionRequest) -> Result<String, RpcError> {
        let result = self
            .make_request("eth_sendTransaction", vec![request.to_rpc_params()])
            .await?;

        result
            .as_str()
            .map(|hash| hash.to_string())
            .ok_or_else(|| RpcError::InvalidResponse("Transaction hash is not a string".to_string()))
    }
}

fn parse_hex_to_u128(hex_str: &str) -> Result<u128, RpcError> {
    let hex_without_prefix = hex_str.strip_prefix("0x").unwrap_or(hex_str);
    u128::from_str_radix(hex_without_prefix, 16)
        .map_err(|e| RpcError::InvalidResponse(format!("Failed to parse hex quantity '{}': {}", hex_str, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_rpc_request_serialization() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: "eth_blockNumber".to_string(),
            params: vec![],
            id: 1,
        };

        let serialized = serde_json::to_string(&request).unwrap();
        let expected = r#"{"jsonrpc":"2.0","method":"eth_blockNumber","params":[],"id":1}"#;
        assert_eq!(serialized, expected);
    }

    #[test]
    fn test_json_rpc_response_deserialization() {
        let response_json = r#"{"jsonrpc":"2.0","result":"0x1234","id":1}"#;
        let response: JsonRpcResponse = serde_json::from_str(response_json).unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap(), json!("0x1234"));

        let response_json = r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":1}"#;
        let response: JsonRpcResponse = serde_json::from_str(response_json).unwrap();
        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found");
    }

    #[test]
    fn test_block_deserialization() {
        let block_json = r#"{
            "number": "0x10",
            "hash": "0xblockhash",
            "timestamp": "0x61cf9980",
            "transactions": [{
                "hash": "0xtx1",
                "from": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
                "to": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "value": "0x0",
                "input": "0x48656c6c6f"
            }]
        }"#;

        let block: Block = serde_json::from_str(block_json).unwrap();
        assert_eq!(block.number, "0x10");
        assert_eq!(block.transactions.len(), 1);
        assert_eq!(block.transactions[0].input.as_deref(), Some("0x48656c6c6f"));
    }

    #[test]
    fn test_transaction_without_input_field() {
        // Some nodes omit the field entirely for plain value transfers
        let tx_json = r#"{
            "hash": "0xtx1",
            "from": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
            "to": null,
            "value": "0x0"
        }"#;

        let tx: Transaction = serde_json::from_str(tx_json).unwrap();
        assert!(tx.to.is_none());
        assert!(tx.input.is_none());
    }

    #[test]
    fn test_transaction_request_rpc_params() {
        let request = TransactionRequest {
            from: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
            to: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
            value: 0,
            gas: 100_000,
            gas_price: 75_000_000_000,
            nonce: 7,
            data: "0x4869207468657265".to_string(),
        };

        let params = request.to_rpc_params();
        assert_eq!(params["value"], "0x0");
        assert_eq!(params["gas"], "0x186a0");
        assert_eq!(params["gasPrice"], "0x1176592e00");
        assert_eq!(params["nonce"], "0x7");
        assert_eq!(params["data"], "0x4869207468657265");
    }

    #[test]
    fn test_parse_hex_to_u128() {
        assert_eq!(parse_hex_to_u128("0x1234").unwrap(), 0x1234);
        assert_eq!(parse_hex_to_u128("1234").unwrap(), 0x1234);
        assert_eq!(parse_hex_to_u128("0x0").unwrap(), 0);
        assert!(parse_hex_to_u128("invalid").is_err());
    }
}
