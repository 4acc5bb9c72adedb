//! Type-model errors

use aptos_crypto::CryptoError;
use aptos_primitives::{AddressError, PrimitiveError};
use thiserror::Error;

/// Type tag parse error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeTagError {
    /// Blank input
    #[error("empty type tag")]
    Empty,

    /// Not `address::module::name`
    #[error("invalid struct tag {0:?}: expected address::module::name")]
    InvalidStructTag(String),

    /// Struct tag address failed to parse
    #[error("invalid address {fragment:?} in type tag: {source}")]
    InvalidAddress {
        /// Address text
        fragment: String,
        /// Parse failure
        source: AddressError,
    },

    /// Module or struct name is not a Move identifier
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),

    /// `<` / `>` do not pair up
    #[error("unbalanced angle brackets in {0:?}")]
    UnbalancedBrackets(String),

    /// `Foo<>` or an empty slot such as `Foo<u8,>`
    #[error("empty type parameter in {0:?}")]
    EmptyTypeParam(String),

    /// Nested deeper than the type tag limit
    #[error("type tag nested deeper than {0} levels")]
    TooDeep(usize),
}

/// Type-model error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// BCS encode/decode error
    #[error("bcs error: {0}")]
    Bcs(#[from] aptos_bcs::Error),

    /// Type tag error
    #[error("type tag error: {0}")]
    TypeTag(#[from] TypeTagError),

    /// Crypto error
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// Primitive error
    #[error("{0}")]
    Primitive(#[from] PrimitiveError),

    /// Key or signature of the wrong size for its scheme
    #[error("invalid {what} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Kind of value
        what: &'static str,
        /// Required length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Operation needs a different signature scheme
    #[error("unsupported signature scheme: {0}")]
    UnsupportedScheme(String),

    /// Payload cannot be used this way
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// A required party has not signed
    #[error("missing {0} signature")]
    MissingSignature(&'static str),

    /// Not `address::module::function`
    #[error("invalid function id {0:?}")]
    InvalidFunctionId(String),
}

impl From<AddressError> for TypesError {
    fn from(err: AddressError) -> Self {
        TypesError::Primitive(PrimitiveError::Address(err))
    }
}
