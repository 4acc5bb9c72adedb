//! CLI error types

use aptos_sdk::SdkError;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid private key
    #[error("Invalid private key: {0}")]
    InvalidKey(String),

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// SDK error
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// Type tag or transaction model error
    #[error(transparent)]
    Types(#[from] aptos_types::TypesError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config error
    #[error("Config error: {0}")]
    Config(String),
}

impl From<aptos_types::TypeTagError> for CliError {
    fn from(e: aptos_types::TypeTagError) -> Self {
        CliError::Types(e.into())
    }
}

impl From<aptos_primitives::AddressError> for CliError {
    fn from(e: aptos_primitives::AddressError) -> Self {
        CliError::InvalidAddress(e.to_string())
    }
}
