pub mod chain;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod generation;
pub mod logging;
pub mod models;

pub use chain::{Block, BlockMonitor, BlockMonitorConfig, Ledger, MonitorStatus, RpcClient, Transaction, TransactionRequest};
pub use codec::{decode_payload, encode_payload};
pub use config::AppConfig;
pub use dispatcher::{DispatchConfig, ResponseDispatcher};
pub use error::{ConfigError, GenerationError, RelayError, Result, RpcError};
pub use generation::{GenerationClient, TextGenerator};
pub use logging::{init_logging, LogContext, MetricsLogger};
pub use models::{Account, InboundMessage};
