use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::signal;
use tokio::time::interval;

use crate::chain::{Ledger, Transaction};
use crate::codec::decode_payload;
use crate::dispatcher::ResponseDispatcher;
use crate::error::Result;
use crate::generation::TextGenerator;
use crate::logging::MetricsLogger;
use crate::models::{Account, InboundMessage};

pub struct BlockMonitorConfig {
    /// Wait between polls, approximating one block period.
    pub poll_interval_seconds: u64,
}

impl Default for BlockMonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 12,
        }
    }
}

/// Discovers inbound messages by polling for newly finalized blocks.
///
/// The last scanned height is the only state, held in memory and never
/// persisted: a cold start always begins at the then-current chain head.
/// Every block in `(last, head]` is scanned exactly once, in order, and each
/// qualifying transaction is handed to the dispatcher synchronously before
/// the next is considered.
pub struct BlockMonitor<L: Ledger, G: TextGenerator> {
    ledger: Arc<L>,
    dispatcher: ResponseDispatcher<L, G>,
    operator: String,
    pub config: BlockMonitorConfig,
    pub shutdown_signal: Arc<AtomicBool>,
    last_height: AtomicU64,
    messages_relayed: AtomicU64,
}

impl<L: Ledger, G: TextGenerator> BlockMonitor<L, G> {
    pub fn new(
        ledger: Arc<L>,
        dispatcher: ResponseDispatcher<L, G>,
        account: &Account,
        config: Option<BlockMonitorConfig>,
    ) -> Self {
        Self {
            ledger,
            dispatcher,
            operator: account.normalized(),
            config: config.unwrap_or_default(),
            shutdown_signal: Arc::new(AtomicBool::new(false)),
            last_height: AtomicU64::new(0),
            messages_relayed: AtomicU64::new(0),
        }
    }

    /// Record the height scanning starts after; blocks at or below it are
    /// never fetched.
    pub fn start_after(&self, height: u64) {
        self.last_height.store(height, Ordering::Relaxed);
    }

    pub fn last_height(&self) -> u64 {
        self.last_height.load(Ordering::Relaxed)
    }

    pub fn messages_relayed(&self) -> u64 {
        self.messages_relayed.load(Ordering::Relaxed)
    }

    /// Request graceful shutdown
    pub fn shutdown(&self) {
        info!("Requesting graceful shutdown");
        self.shutdown_signal.store(true, Ordering::Relaxed);
    }

    /// Run the polling loop until shutdown.
    ///
    /// Errors inside a polling cycle are logged and the loop continues after
    /// the standard wait; only the initial head query can fail this method.
    pub async fn run(&self) -> Result<()> {
        info!(
            "Starting block monitor with {} second polling interval",
            self.config.poll_interval_seconds
        );

        // Cold start at the current chain head
        let head = self.ledger.latest_block_number().await?;
        self.start_after(head);
        info!("Starting from block number: {}", head);

        let shutdown_signal = Arc::clone(&self.shutdown_signal);
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received shutdown signal");
                    shutdown_signal.store(true, Ordering::Relaxed);
                }
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                }
            }
        });

        let mut interval = interval(Duration::from_secs(self.config.poll_interval_seconds));

        loop {
            if self.shutdown_signal.load(Ordering::Relaxed) {
                info!(
                    "Shutdown signal received, stopping block monitor at height {}",
                    self.last_height()
                );
                return Ok(());
            }

            interval.tick().await;

            match self.poll_once().await {
                Ok(relayed) => {
                    if relayed > 0 {
                        debug!(
                            "Relayed {} messages, current height: {}",
                            relayed,
                            self.last_height()
                        );
                    }
                }
                Err(e) => {
                    // Transient by design: keep polling
                    warn!("Error during polling cycle: {}", e);
                }
            }
        }
    }

    /// One polling iteration: query the head and scan every block above the
    /// last recorded height. Returns the number of messages relayed.
    pub async fn poll_once(&self) -> Result<u64> {
        let head = self.ledger.latest_block_number().await?;
        let last = self.last_height();

        if head <= last {
            return Ok(0);
        }

        let mut relayed = 0;
        for height in (last + 1)..=head {
            if self.shutdown_signal.load(Ordering::Relaxed) {
                info!("Shutdown signal received during block scanning");
                break;
            }

            match self.scan_block(height).await {
                Ok(count) => relayed += count,
                Err(e) => {
                    // The height still advances: availability over completeness
                    error!("Failed to scan block {}: {}", height, e);
                }
            }
            self.last_height.store(height, Ordering::Relaxed);
        }

        self.messages_relayed.fetch_add(relayed, Ordering::Relaxed);
        Ok(relayed)
    }

    /// Scan one block's transactions and dispatch each qualifying message,
    /// in block transaction order.
    async fn scan_block(&self, height: u64) -> Result<u64> {
        let block = self.ledger.block_by_number(height).await?;
        let tx_count = block.transactions.len();
        let mut relayed = 0;

        for tx in &block.transactions {
            if !self.qualifies(tx) {
                continue;
            }

            let payload = tx.input.as_deref().unwrap_or_default();
            let Some(text) = decode_payload(payload) else {
                debug!("Transaction {} payload decodes to no text, skipping", tx.hash);
                continue;
            };

            let message = InboundMessage {
                sender: tx.from.clone(),
                text,
                tx_hash: tx.hash.clone(),
                block_number: height,
            };
            info!("Received message: {}", message.text);
            info!("From sender: {}", message.sender);

            match self.dispatcher.handle(&message).await {
                Ok(response_hash) => {
                    MetricsLogger::log_message_relayed(&message.sender, &message.tx_hash, &response_hash);
                    relayed += 1;
                }
                Err(e) => {
                    // Dropped after one attempt; later messages are unaffected
                    error!(
                        "Failed to handle message from {} in transaction {}: {}",
                        message.sender, message.tx_hash, e
                    );
                }
            }
        }

        MetricsLogger::log_block_scanned(height, tx_count, relayed);
        Ok(relayed)
    }

    /// A transaction qualifies when it is addressed to the operator
    /// (case-insensitive) and carries payload bytes beyond the `"0x"`
    /// no-data sentinel.
    fn qualifies(&self, tx: &Transaction) -> bool {
        let Some(to) = tx.to.as_deref() else {
            return false; // Contract creation
        };
        if crate::chain::normalize_address(to) != self.operator {
            return false;
        }

        matches!(tx.input.as_deref(), Some(input) if !input.is_empty() && input != "0x")
    }

    /// Current monitoring snapshot for status logging.
    pub async fn status(&self) -> Result<MonitorStatus> {
        let latest_block = self.ledger.latest_block_number().await?;
        let last_scanned_block = self.last_height();

        Ok(MonitorStatus {
            latest_block,
            last_scanned_block,
            blocks_behind: latest_block.saturating_sub(last_scanned_block),
            messages_relayed: self.messages_relayed(),
            is_running: !self.shutdown_signal.load(Ordering::Relaxed),
        })
    }
}

#[derive(Debug, Clone)]
pub struct MonitorStatus {
    pub latest_block: u64,
    pub last_scanned_block: u64,
    pub blocks_behind: u64,
    pub messages_relayed: u64,
    pub is_running: bool,
}
