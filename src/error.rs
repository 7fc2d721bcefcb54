use thiserror::Error;

/// Main error type for the message relay application
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the ledger JSON-RPC interface
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC method error: code={code}, message={message}")]
    Method { code: i32, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Block not found: {block_number}")]
    BlockNotFound { block_number: u64 },
}

/// Errors from the text-generation collaborator
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: status={status}, message={message}")]
    Api { status: u16, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Completion contained no text")]
    EmptyCompletion,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Invalid address format: {0}")]
    InvalidAddress(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    /// Whether the monitor loop should keep polling after this error.
    ///
    /// Transient infrastructure and collaborator failures are logged per
    /// iteration and never stop the loop; configuration errors abort the
    /// process before the loop starts.
    pub fn is_transient(&self) -> bool {
        match self {
            RelayError::Rpc(_) => true,
            RelayError::Generation(_) => true,
            RelayError::Config(_) => false,
        }
    }
}
