use log::{debug, error, info, warn, LevelFilter};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::LoggingConfig;

/// Structured logging context for the relay
pub struct LogContext {
    pub component: String,
    pub operation: String,
    pub metadata: HashMap<String, Value>,
}

impl LogContext {
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn with_block_number(self, block_number: u64) -> Self {
        self.with_metadata("block_number", json!(block_number))
    }

    pub fn with_transaction_hash(self, tx_hash: &str) -> Self {
        self.with_metadata("transaction_hash", json!(tx_hash))
    }

    pub fn with_sender(self, sender: &str) -> Self {
        self.with_metadata("sender", json!(sender))
    }

    fn format_message(&self, level: &str, message: &str) -> String {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let mut log_entry = json!({
            "timestamp": timestamp,
            "level": level,
            "component": self.component,
            "operation": self.operation,
            "message": message,
        });

        for (key, value) in &self.metadata {
            log_entry[key] = value.clone();
        }

        log_entry.to_string()
    }

    pub fn info(&self, message: &str) {
        info!("{}", self.format_message("INFO", message));
    }

    pub fn warn(&self, message: &str) {
        warn!("{}", self.format_message("WARN", message));
    }

    pub fn error(&self, message: &str) {
        error!("{}", self.format_message("ERROR", message));
    }

    pub fn debug(&self, message: &str) {
        debug!("{}", self.format_message("DEBUG", message));
    }
}

/// Relay metrics and progress lines
pub struct MetricsLogger;

impl MetricsLogger {
    pub fn log_block_scanned(block_number: u64, transaction_count: usize, message_count: u64) {
        let context = LogContext::new("metrics", "block_scanned")
            .with_block_number(block_number)
            .with_metadata("transaction_count", json!(transaction_count))
            .with_metadata("message_count", json!(message_count));

        if message_count > 0 {
            context.info(&format!(
                "Block {} scanned: {} messages in {} transactions",
                block_number, message_count, transaction_count
            ));
        } else {
            context.debug(&format!(
                "Block {} scanned: no messages in {} transactions",
                block_number, transaction_count
            ));
        }
    }

    pub fn log_message_relayed(sender: &str, request_tx: &str, response_tx: &str) {
        let context = LogContext::new("metrics", "message_relayed")
            .with_sender(sender)
            .with_metadata("request_tx", json!(request_tx))
            .with_metadata("response_tx", json!(response_tx));

        context.info(&format!(
            "Relayed message from {} ({} -> {})",
            sender, request_tx, response_tx
        ));
    }

    pub fn log_rpc_call(method: &str, duration_ms: u64, success: bool) {
        let context = LogContext::new("metrics", "rpc_call")
            .with_metadata("method", json!(method))
            .with_metadata("duration_ms", json!(duration_ms))
            .with_metadata("success", json!(success));

        if success {
            context.debug(&format!("RPC call {} completed in {}ms", method, duration_ms));
        } else {
            context.warn(&format!("RPC call {} failed after {}ms", method, duration_ms));
        }
    }
}

/// Initialize logging from configuration
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level = match config.level.as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    let json_format = config.format == "json";

    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format(move |buf, record| {
            use std::io::Write;

            let args = record.args().to_string();
            if json_format {
                if serde_json::from_str::<Value>(&args).is_ok() {
                    return writeln!(buf, "{}", args);
                }
                writeln!(
                    buf,
                    "{}",
                    json!({
                        "timestamp": chrono::Utc::now().to_rfc3339(),
                        "level": record.level().to_string(),
                        "target": record.target(),
                        "message": args,
                    })
                )
            } else {
                writeln!(
                    buf,
                    "{} [{}] {}: {}",
                    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    args
                )
            }
        })
        .try_init()?;

    info!("Logging initialized at {} level", config.level);
    Ok(())
}
