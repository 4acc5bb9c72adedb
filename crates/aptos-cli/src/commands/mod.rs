//! Subcommand implementations

pub mod codec;
pub mod query;
pub mod transfer;

use aptos_sdk::{AptosClient, ClientConfig};

use crate::{config::Config, CliError};

/// HTTP client for the node in `config`
pub fn client(config: &Config) -> Result<AptosClient, CliError> {
    Ok(AptosClient::new(&ClientConfig::new(config.node_url()))?)
}
