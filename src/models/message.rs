use serde::{Deserialize, Serialize};

/// A decoded text message found in an inbound transaction.
///
/// Derived once per qualifying transaction and discarded after dispatch;
/// nothing about it is retried or queued.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InboundMessage {
    pub sender: String,
    pub text: String,
    pub tx_hash: String,
    pub block_number: u64,
}
