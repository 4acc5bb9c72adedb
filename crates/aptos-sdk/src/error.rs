//! SDK error types

use std::fmt;

use aptos_crypto::CryptoError;
use aptos_primitives::{AddressError, PrimitiveError};
use aptos_types::TypesError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error codes reported by the node in `error_code`
pub mod error_codes {
    /// Account does not exist
    pub const ACCOUNT_NOT_FOUND: &str = "account_not_found";
    /// Resource does not exist under the account
    pub const RESOURCE_NOT_FOUND: &str = "resource_not_found";
    /// Module does not exist under the account
    pub const MODULE_NOT_FOUND: &str = "module_not_found";
    /// Requested version is older than the node keeps
    pub const VERSION_PRUNED: &str = "version_pruned";
    /// Malformed request
    pub const INVALID_INPUT: &str = "invalid_input";
    /// Mempool rejected the transaction for lack of space
    pub const MEMPOOL_IS_FULL: &str = "mempool_is_full";
    /// Move VM rejected the transaction
    pub const VM_ERROR: &str = "vm_error";
    /// Node-side failure
    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Error body returned by the node for a status of 400 or above
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// HTTP status
    #[serde(skip)]
    pub status_code: u16,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Machine-readable code, see [`error_codes`]
    #[serde(default)]
    pub error_code: Option<String>,
    /// Move VM status code
    #[serde(default)]
    pub vm_error_code: Option<u64>,
}

impl ApiError {
    /// Build from an error response
    ///
    /// A JSON object body is parsed as the node's error format; anything else
    /// becomes the message.
    pub fn from_response(status_code: u16, body: &Value) -> Self {
        let parsed = match body {
            Value::Object(_) => serde_json::from_value::<ApiError>(body.clone()).ok(),
            _ => None,
        };
        match parsed {
            Some(err) => ApiError {
                status_code,
                ..err
            },
            None => ApiError {
                status_code,
                message: match body {
                    Value::String(text) => text.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                },
                error_code: None,
                vm_error_code: None,
            },
        }
    }

    fn has_code(&self, code: &str) -> bool {
        self.error_code.as_deref() == Some(code)
    }

    /// Account, resource or module not found
    pub fn is_not_found(&self) -> bool {
        self.has_code(error_codes::ACCOUNT_NOT_FOUND)
            || self.has_code(error_codes::RESOURCE_NOT_FOUND)
            || self.has_code(error_codes::MODULE_NOT_FOUND)
    }

    /// Account not found
    pub fn is_account_not_found(&self) -> bool {
        self.has_code(error_codes::ACCOUNT_NOT_FOUND)
    }

    /// Resource not found
    pub fn is_resource_not_found(&self) -> bool {
        self.has_code(error_codes::RESOURCE_NOT_FOUND)
    }

    /// Requested version was pruned
    pub fn is_version_pruned(&self) -> bool {
        self.has_code(error_codes::VERSION_PRUNED)
    }

    /// Mempool is full
    pub fn is_mempool_full(&self) -> bool {
        self.has_code(error_codes::MEMPOOL_IS_FULL)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_code {
            Some(code) => write!(f, "api error [{}]: {}", code, self.message),
            None => write!(f, "api error [{}]: {}", self.status_code, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

/// SDK error type
#[derive(Debug, Error)]
pub enum SdkError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Error response from the node
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Response body did not match the expected shape
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Transaction model error
    #[error("Transaction error: {0}")]
    Types(#[from] TypesError),

    /// Key or signing error
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Address, hash or number error
    #[error("{0}")]
    Primitive(#[from] PrimitiveError),

    /// Conflicting or invalid build options
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Node returned a value that cannot be used
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl SdkError {
    fn api(&self) -> Option<&ApiError> {
        match self {
            SdkError::Api(err) => Some(err),
            _ => None,
        }
    }

    /// See [`ApiError::is_not_found`]
    pub fn is_not_found(&self) -> bool {
        self.api().is_some_and(ApiError::is_not_found)
    }

    /// See [`ApiError::is_account_not_found`]
    pub fn is_account_not_found(&self) -> bool {
        self.api().is_some_and(ApiError::is_account_not_found)
    }

    /// See [`ApiError::is_resource_not_found`]
    pub fn is_resource_not_found(&self) -> bool {
        self.api().is_some_and(ApiError::is_resource_not_found)
    }

    /// See [`ApiError::is_version_pruned`]
    pub fn is_version_pruned(&self) -> bool {
        self.api().is_some_and(ApiError::is_version_pruned)
    }

    /// See [`ApiError::is_mempool_full`]
    pub fn is_mempool_full(&self) -> bool {
        self.api().is_some_and(ApiError::is_mempool_full)
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        SdkError::Serialization(e.to_string())
    }
}

impl From<AddressError> for SdkError {
    fn from(e: AddressError) -> Self {
        SdkError::Primitive(PrimitiveError::Address(e))
    }
}
