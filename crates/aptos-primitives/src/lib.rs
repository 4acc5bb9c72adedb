//! # aptos-primitives
//!
//! Primitive types for Move-based chains.
//!
//! - [`AccountAddress`]: 32-byte account address with full and short hex forms
//! - [`HashValue`]: 32-byte SHA3-256 output
//! - [`U128`] / [`U256`]: Move's wide unsigned integers, decimal strings in JSON
//!
//! All of them implement the BCS traits from `aptos-bcs`. JSON support is
//! behind the `serde` feature.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod error;
mod hash;
mod num;

pub use address::{AccountAddress, AddressError};
pub use error::PrimitiveError;
pub use hash::{HashError, HashValue};
pub use num::{ParseNumberError, U128, U256};

pub use num_bigint::{BigInt, BigUint};

/// Chain identifier
pub type ChainId = u8;

/// Account sequence number
pub type SequenceNumber = u64;

/// Gas amount in gas units
pub type Gas = u64;
