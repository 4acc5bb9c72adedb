//! # aptos-sdk
//!
//! Async client SDK for Move-based chains.
//!
//! ## Features
//!
//! - **AptosClient**: REST client for fullnodes, with transaction building
//! - **Account**: Key management and transaction signing
//! - **Transport**: Pluggable HTTP layer, with a mock for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use aptos_sdk::{Account, AptosClient, BuildOptions, ClientConfig};
//! use aptos_types::args::{address_arg, u64_arg};
//! use aptos_types::{EntryFunction, TransactionPayload};
//! use aptos_primitives::AccountAddress;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AptosClient::new(&ClientConfig::devnet())?;
//!     let account = Account::generate_ed25519();
//!
//!     let to = AccountAddress::from_hex("0xcafe")?;
//!     let payload = TransactionPayload::from(EntryFunction::from_function_id(
//!         "0x1::aptos_account::transfer",
//!         vec![],
//!         vec![address_arg(&to), u64_arg(1_000)],
//!     )?);
//!
//!     let pending = client
//!         .sign_and_submit(&account, payload, &BuildOptions::default())
//!         .await?;
//!     let committed = client
//!         .poll_for_transaction(&pending.data.hash, aptos_sdk::DEFAULT_POLL_INTERVAL)
//!         .await?;
//!     println!("success: {}", committed.is_success());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod account;
mod client;
mod config;
mod error;
mod options;
pub mod transport;
mod tx_builder;
pub mod types;

pub use account::Account;
pub use client::{AptosClient, DEFAULT_POLL_INTERVAL};
pub use config::{ClientConfig, Network, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use error::{error_codes, ApiError, SdkError};
pub use options::{
    BuildOptions, RequestOptions, SimulateOptions, DEFAULT_EXPIRATION_SECS,
    DEFAULT_GAS_UNIT_PRICE, DEFAULT_MAX_GAS_AMOUNT,
};
pub use transport::{MockTransport, Transport};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use types::{Response, ResponseMetadata};
