use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid {value_type} value {raw:?}: {reason}")]
    InvalidValue {
        value_type: String,
        raw: String,
        reason: String,
    },

    #[error("unknown value type: {0}")]
    UnknownValueType(String),

    #[error("unknown network: {0} (expected TESTNET or MAINNET)")]
    UnknownNetwork(String),
}

/// Errors produced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
