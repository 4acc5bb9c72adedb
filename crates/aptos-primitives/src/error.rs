//! Common error types for primitives

use thiserror::Error;

use crate::address::AddressError;
use crate::hash::HashError;
use crate::num::ParseNumberError;

/// Primitive operation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// Address error
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// Hash error
    #[error("hash error: {0}")]
    Hash(#[from] HashError),

    /// Number error
    #[error("number error: {0}")]
    Number(#[from] ParseNumberError),
}
