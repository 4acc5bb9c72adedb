//! # aptos-types
//!
//! Transaction model for Move-based chains.
//!
//! This crate provides:
//! - [`TypeTag`](type_tag::TypeTag) - Move types, parsed from and printed to source syntax
//! - [`TransactionPayload`](payload::TransactionPayload) - Scripts, entry functions, multisig and orderless payloads
//! - [`TransactionAuthenticator`](authenticator::TransactionAuthenticator) - Single-key, legacy, multi-agent and fee-payer proofs
//! - [`RawTransaction`](transaction::RawTransaction) / [`SignedTransaction`](transaction::SignedTransaction) - Signing message, submission bytes and hash
//! - [`args`] - BCS encoders for entry-function arguments
//!
//! Every type implements the BCS traits from `aptos-bcs`, in both directions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod args;
pub mod authenticator;
pub mod error;
pub mod payload;
pub mod transaction;
pub mod type_tag;

// Re-export commonly used types
pub use authenticator::{AccountAuthenticator, AnyPublicKey, AnySignature, TransactionAuthenticator};
pub use error::{TypeTagError, TypesError};
pub use payload::{
    EntryFunction, Multisig, Script, ScriptArgument, TransactionExecutable, TransactionExtraConfig,
    TransactionInnerPayload, TransactionPayload,
};
pub use transaction::{
    RawTransaction, RawTransactionWithData, SignedTransaction, ORDERLESS_SEQUENCE_NUMBER,
};
pub use type_tag::{parse_type_tag, ModuleId, StructTag, TypeTag, MAX_TYPE_TAG_DEPTH};
