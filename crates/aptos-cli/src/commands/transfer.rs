//! `transfer`: build, sign and submit a coin transfer

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aptos_crypto::SignatureScheme;
use aptos_primitives::AccountAddress;
use aptos_sdk::{Account, AptosClient, BuildOptions, DEFAULT_POLL_INTERVAL};
use aptos_types::args::{address_arg, u64_arg};
use aptos_types::{EntryFunction, TransactionPayload};

use crate::{config::Config, output::Output, CliError};

/// Entry function used for transfers
pub const TRANSFER_FUNCTION: &str = "0x1::aptos_account::transfer";

/// How long `--wait` polls before giving up
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Arguments of `transfer`
#[derive(Debug, Clone)]
pub struct TransferArgs {
    /// Recipient
    pub to: String,
    /// Amount in octas
    pub amount: u64,
    /// Sender's private key, hex
    pub key: String,
    /// Key scheme
    pub scheme: SignatureScheme,
    /// Wait for commit
    pub wait: bool,
}

/// `0x1::aptos_account::transfer(to, amount)`
pub fn transfer_payload(to: &AccountAddress, amount: u64) -> Result<TransactionPayload, CliError> {
    let entry = EntryFunction::from_function_id(
        TRANSFER_FUNCTION,
        vec![],
        vec![address_arg(to), u64_arg(amount)],
    )?;
    Ok(entry.into())
}

/// Build options from the CLI config
pub fn build_options(config: &Config) -> BuildOptions {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    BuildOptions::new()
        .max_gas_amount(config.max_gas_amount)
        .expiration_timestamp_secs(now + config.expiration_secs)
}

/// Run `transfer`
pub async fn run(
    client: &AptosClient,
    config: &Config,
    args: TransferArgs,
    json: bool,
) -> Result<(), CliError> {
    let to = AccountAddress::from_hex(&args.to)?;
    if args.amount == 0 {
        return Err(CliError::InvalidAmount("amount must be positive".to_string()));
    }
    let account = Account::from_private_key_hex(args.scheme, &args.key)
        .map_err(|e| CliError::InvalidKey(e.to_string()))?;

    let payload = transfer_payload(&to, args.amount)?;
    let pending = client
        .sign_and_submit(&account, payload, &build_options(config))
        .await?
        .data;
    tracing::info!(hash = %pending.hash, from = %account.address(), to = %to, "transfer submitted");

    if !args.wait {
        Output::new(json)
            .field("hash", &pending.hash)
            .field("sender", &account.address().to_hex())
            .field("status", "pending")
            .message(&format!("Submitted transaction {}", pending.hash))
            .print();
        return Ok(());
    }

    let committed = tokio::time::timeout(
        WAIT_TIMEOUT,
        client.poll_for_transaction(&pending.hash, DEFAULT_POLL_INTERVAL),
    )
    .await
    .map_err(|_| {
        CliError::InvalidInput(format!(
            "transaction {} not committed within {}s",
            pending.hash,
            WAIT_TIMEOUT.as_secs()
        ))
    })??;

    let status = if committed.is_success() { "success" } else { "failed" };
    Output::new(json)
        .field("hash", &committed.hash)
        .field("sender", &account.address().to_hex())
        .field("status", status)
        .field("vm_status", committed.vm_status.as_deref().unwrap_or_default())
        .field_u64("version", committed.version_u64().unwrap_or_default())
        .field_u64("gas_used", committed.gas_used_u64().unwrap_or_default())
        .message(&format!(
            "Transaction {} {} at version {}",
            committed.hash,
            status,
            committed.version.as_deref().unwrap_or("?")
        ))
        .print();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_payload_shape() {
        let to = AccountAddress::from_hex("0xcafe").unwrap();
        let TransactionPayload::EntryFunction(entry) = transfer_payload(&to, 5).unwrap() else {
            panic!("transfer must be an entry function");
        };
        assert_eq!(entry.function_id(), "0x1::aptos_account::transfer");
        assert_eq!(entry.args[0], to.as_bytes().to_vec());
        assert_eq!(entry.args[1], 5u64.to_le_bytes().to_vec());
    }

    #[test]
    fn test_build_options_from_config() {
        let config = Config {
            max_gas_amount: 777,
            expiration_secs: 30,
            ..Config::default()
        };
        let options = build_options(&config);
        assert_eq!(options.max_gas_amount, Some(777));
        assert!(options.expiration_timestamp_secs.is_some());
        assert_eq!(options.sequence_number, None);
    }
}
