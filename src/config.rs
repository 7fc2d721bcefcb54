use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::chain::validate_address;
use crate::dispatcher::DEFAULT_SYSTEM_PROMPT;
use crate::error::ConfigError;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub rpc: RpcConfig,
    pub account: AccountConfig,
    pub generation: GenerationConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

/// Ledger RPC configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Ledger JSON-RPC endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Operator account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Operator address; the node holds the signing key for it
    pub address: String,
}

/// Text-generation collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Messages API base URL
    pub endpoint: String,
    /// API credential; only read from the environment, never from file
    #[serde(default, skip_serializing)]
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Cap on generated reply length
    pub max_tokens: u32,
    /// Fixed system instruction sent with every request
    pub system_prompt: String,
}

/// Relay tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Block polling interval in seconds, approximating one block period
    pub poll_interval_seconds: u64,
    /// Fixed gas limit for response transactions
    pub gas_limit: u64,
    /// Premium in wei added to the suggested gas price
    pub gas_premium_wei: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            account: AccountConfig::default(),
            generation: GenerationConfig::default(),
            relay: RelayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8545".to_string(),
            timeout_seconds: 30,
        }
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            // Must be overridden via OPERATOR_ADDRESS or the config file
            address: "0x0000000000000000000000000000000000000000".to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com".to_string(),
            api_key: String::new(),
            model: "claude-3-sonnet-20240229".to_string(),
            max_tokens: 1000,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 12,
            gas_limit: 100_000,
            gas_premium_wei: 50_000_000_000, // 50 gwei
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables.
    /// Environment variables take precedence over file values.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file().unwrap_or_default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if !Path::new(&config_path).exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| ConfigError::FileNotFound(config_path.clone()))?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parsing(e.to_string()))?;
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(endpoint) = env::var("RPC_URL") {
            self.rpc.endpoint = endpoint;
        }
        if let Ok(timeout) = env::var("RPC_TIMEOUT_SECONDS") {
            self.rpc.timeout_seconds = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                key: "RPC_TIMEOUT_SECONDS".to_string(),
                value: timeout,
            })?;
        }

        if let Ok(address) = env::var("OPERATOR_ADDRESS") {
            self.account.address = address;
        }

        if let Ok(api_key) = env::var("ANTHROPIC_API_KEY") {
            self.generation.api_key = api_key;
        }
        if let Ok(endpoint) = env::var("GENERATION_ENDPOINT") {
            self.generation.endpoint = endpoint;
        }
        if let Ok(model) = env::var("GENERATION_MODEL") {
            self.generation.model = model;
        }
        if let Ok(max_tokens) = env::var("GENERATION_MAX_TOKENS") {
            self.generation.max_tokens =
                max_tokens.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "GENERATION_MAX_TOKENS".to_string(),
                    value: max_tokens,
                })?;
        }

        if let Ok(interval) = env::var("BLOCK_POLL_INTERVAL") {
            self.relay.poll_interval_seconds =
                interval.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "BLOCK_POLL_INTERVAL".to_string(),
                    value: interval,
                })?;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rpc.endpoint.starts_with("http://") && !self.rpc.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(self.rpc.endpoint.clone()));
        }
        if self.rpc.timeout_seconds == 0 || self.rpc.timeout_seconds > 300 {
            return Err(ConfigError::InvalidValue {
                key: "rpc.timeout_seconds".to_string(),
                value: self.rpc.timeout_seconds.to_string(),
            });
        }

        validate_address(&self.account.address)?;

        if !self.generation.endpoint.starts_with("http://")
            && !self.generation.endpoint.starts_with("https://")
        {
            return Err(ConfigError::InvalidUrl(self.generation.endpoint.clone()));
        }
        // Missing credentials abort before the monitor loop starts
        if self.generation.api_key.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string()));
        }
        if self.generation.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "generation.max_tokens".to_string(),
                value: self.generation.max_tokens.to_string(),
            });
        }

        if self.relay.poll_interval_seconds == 0 || self.relay.poll_interval_seconds > 300 {
            return Err(ConfigError::InvalidValue {
                key: "relay.poll_interval_seconds".to_string(),
                value: self.relay.poll_interval_seconds.to_string(),
            });
        }
        if self.relay.gas_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "relay.gas_limit".to_string(),
                value: self.relay.gas_limit.to_string(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                value: self.logging.format.clone(),
            });
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample_config() -> Result<String, ConfigError> {
        let config = Self::default();
        toml::to_string_pretty(&config).map_err(|e| ConfigError::Parsing(e.to_string()))
    }
}
