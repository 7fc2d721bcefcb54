use std::sync::Arc;

use log::{debug, info};

use crate::chain::{Ledger, TransactionRequest};
use crate::codec::encode_payload;
use crate::error::Result;
use crate::generation::TextGenerator;
use crate::logging::LogContext;
use crate::models::{Account, InboundMessage};

/// Default instruction given to the text-generation collaborator.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an assistant that replies to text messages \
delivered over a public blockchain. Replies are posted on-chain where space costs money, \
so keep them short and direct.";

/// Tuning for outbound responses.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Fixed conservative gas limit; no estimation step.
    pub gas_limit: u64,
    /// Premium added to the suggested gas price to prioritize inclusion.
    pub gas_premium_wei: u128,
    /// Cap on generated reply length.
    pub max_tokens: u32,
    pub system_prompt: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            gas_limit: 100_000,
            gas_premium_wei: 50_000_000_000, // 50 gwei
            max_tokens: 1000,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Turns one inbound message into one signed, broadcast response.
///
/// At most one attempt per message: a generation or send failure is reported
/// to the caller, which logs it and moves on. No retry, no queue.
pub struct ResponseDispatcher<L: Ledger, G: TextGenerator> {
    ledger: Arc<L>,
    generator: Arc<G>,
    account: Account,
    pub config: DispatchConfig,
}

impl<L: Ledger, G: TextGenerator> ResponseDispatcher<L, G> {
    pub fn new(ledger: Arc<L>, generator: Arc<G>, account: Account, config: DispatchConfig) -> Self {
        Self {
            ledger,
            generator,
            account,
            config,
        }
    }

    /// Obtain a reply for one inbound message and submit it back to the
    /// sender. Returns the response transaction hash.
    pub async fn handle(&self, message: &InboundMessage) -> Result<String> {
        let context = LogContext::new("dispatcher", "handle")
            .with_transaction_hash(&message.tx_hash)
            .with_sender(&message.sender);
        context.debug("Generating reply");

        let prompt = format!("Please respond to this blockchain message: {}", message.text);
        let reply = self
            .generator
            .generate(&self.config.system_prompt, &prompt, self.config.max_tokens)
            .await?;

        self.send(&message.sender, &reply).await
    }

    /// Build, submit, and log one zero-value response transaction.
    pub async fn send(&self, recipient: &str, text: &str) -> Result<String> {
        info!("Sending message to {}: {}", recipient, text);

        // Fetched fresh at send time so queued-but-unmined sends are counted
        let nonce = self.ledger.pending_nonce(&self.account.address).await?;
        let gas_price = self.ledger.gas_price().await? + self.config.gas_premium_wei;

        let request = TransactionRequest {
            from: self.account.address.clone(),
            to: recipient.to_string(),
            value: 0,
            gas: self.config.gas_limit,
            gas_price,
            nonce,
            data: encode_payload(text),
        };
        debug!("Submitting response transaction with nonce {} at gas price {} wei", nonce, gas_price);

        let tx_hash = self.ledger.send_transaction(&request).await?;
        info!("Response sent: {}", tx_hash);

        Ok(tx_hash)
    }
}
