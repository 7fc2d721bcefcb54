use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chain_message_relay::chain::{Ledger, RpcClient, TransactionRequest};
use chain_message_relay::error::RpcError;

fn rpc_result(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": value,
    }))
}

#[tokio::test]
async fn test_latest_block_number() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(serde_json::json!({"method": "eth_blockNumber"})))
        .respond_with(rpc_result(serde_json::json!("0x1234567")))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    assert_eq!(client.latest_block_number().await.unwrap(), 0x1234567);
}

#[tokio::test]
async fn test_block_by_number_requests_full_transactions() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "method": "eth_getBlockByNumber",
            "params": ["0x10", true],
        })))
        .respond_with(rpc_result(serde_json::json!({
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
        })))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    let block = client.block_by_number(0x10).await.unwrap();
    assert_eq!(block.transactions.len(), 1);
    assert_eq!(block.transactions[0].input.as_deref(), Some("0x48656c6c6f"));
}

#[tokio::test]
async fn test_block_by_number_null_is_not_found() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(serde_json::Value::Null))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    let result = client.block_by_number(99).await;
    assert!(matches!(
        result,
        Err(RpcError::BlockNotFound { block_number: 99 })
    ));
}

#[tokio::test]
async fn test_null_quantity_result_is_invalid() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(serde_json::Value::Null))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    let result = client.latest_block_number().await;
    assert!(matches!(result, Err(RpcError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_pending_nonce_uses_pending_tag() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "method": "eth_getTransactionCount",
            "params": ["0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "pending"],
        })))
        .respond_with(rpc_result(serde_json::json!("0x7")))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    let nonce = client
        .pending_nonce("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
        .await
        .unwrap();
    assert_eq!(nonce, 7);
}

#[tokio::test]
async fn test_gas_price() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"method": "eth_gasPrice"})))
        .respond_with(rpc_result(serde_json::json!("0x5d21dba00")))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    assert_eq!(client.gas_price().await.unwrap(), 25_000_000_000);
}

#[tokio::test]
async fn test_send_transaction_submits_hex_quantities() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "method": "eth_sendTransaction",
            "params": [{
                "from": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                "to": "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
                "value": "0x0",
                "gas": "0x186a0",
                "gasPrice": "0x1176592e00",
                "nonce": "0x7",
                "data": "0x4869207468657265",
            }],
        })))
        .respond_with(rpc_result(serde_json::json!("0xtxhash")))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    let request = TransactionRequest {
        from: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string(),
        to: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string(),
        value: 0,
        gas: 100_000,
        gas_price: 75_000_000_000,
        nonce: 7,
        data: "0x4869207468657265".to_string(),
    };

    let tx_hash = client.send_transaction(&request).await.unwrap();
    assert_eq!(tx_hash, "0xtxhash");
}

#[tokio::test]
async fn test_rpc_method_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "Method not found"}
        })))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    let result = client.latest_block_number().await;
    assert!(matches!(result, Err(RpcError::Method { code: -32601, .. })));
}

#[tokio::test]
async fn test_http_error_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    let result = client.latest_block_number().await;
    assert!(matches!(result, Err(RpcError::Connection(_))));
}

#[tokio::test]
async fn test_invalid_json_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    assert!(client.latest_block_number().await.is_err());
}

#[tokio::test]
async fn test_get_balance() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "method": "eth_getBalance",
            "params": ["0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "latest"],
        })))
        .respond_with(rpc_result(serde_json::json!("0xde0b6b3a7640000")))
        .mount(&mock_server)
        .await;

    let client = RpcClient::new(mock_server.uri());
    let balance = client
        .get_balance("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa")
        .await
        .unwrap();
    assert_eq!(balance, 1_000_000_000_000_000_000);
}
