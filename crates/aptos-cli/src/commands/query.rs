//! Read-only node queries

use aptos_primitives::AccountAddress;
use aptos_sdk::{AptosClient, RequestOptions};

use crate::{output::Output, CliError};

/// Coin type queried by `balance` when none is given
pub const APTOS_COIN: &str = "0x1::aptos_coin::AptosCoin";

/// `info`
pub async fn info(client: &AptosClient, json: bool) -> Result<(), CliError> {
    let info = client.get_ledger_info().await?.data;
    Output::new(json)
        .field_u64("chain_id", u64::from(info.chain_id))
        .field("epoch", &info.epoch)
        .field("ledger_version", &info.ledger_version)
        .field("block_height", &info.block_height)
        .field("ledger_timestamp", &info.ledger_timestamp)
        .field("node_role", &info.node_role)
        .message(&format!(
            "Chain ID: {}\nEpoch: {}\nLedger version: {}\nBlock height: {}\nNode role: {}",
            info.chain_id, info.epoch, info.ledger_version, info.block_height, info.node_role
        ))
        .print();
    Ok(())
}

/// `account <address>`
pub async fn account(client: &AptosClient, address: &str, json: bool) -> Result<(), CliError> {
    let address = AccountAddress::from_hex(address)?;
    let data = client
        .get_account(&address, &RequestOptions::default())
        .await?
        .data;
    Output::new(json)
        .field("address", &address.to_hex())
        .field("sequence_number", &data.sequence_number)
        .field("authentication_key", &data.authentication_key)
        .message(&format!(
            "Address: {}\nSequence number: {}\nAuthentication key: {}",
            address, data.sequence_number, data.authentication_key
        ))
        .print();
    Ok(())
}

/// `balance <address> [--asset]`
pub async fn balance(
    client: &AptosClient,
    address: &str,
    asset: &str,
    json: bool,
) -> Result<(), CliError> {
    let address = AccountAddress::from_hex(address)?;
    let balance = client
        .get_account_balance(&address, asset, &RequestOptions::default())
        .await?
        .data;
    Output::new(json)
        .field("address", &address.to_hex())
        .field("asset", asset)
        .field_u64("balance", balance)
        .message(&format!("{} {}", balance, asset))
        .print();
    Ok(())
}
