//! # aptos-lite
//!
//! Command-line interface for Move-based chains.
//!
//! ## Usage
//!
//! ```bash
//! # Node queries
//! aptos-lite info
//! aptos-lite account 0x1
//! aptos-lite balance 0x1 --asset 0x1::aptos_coin::AptosCoin
//!
//! # Transfers
//! aptos-lite transfer --to 0xcafe --amount 1000 --key 0x... --wait
//!
//! # Offline helpers
//! aptos-lite parse-type "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>"
//! aptos-lite address 0x1
//! aptos-lite encode-arg u64 1000
//!
//! # Configuration
//! aptos-lite config --set-network testnet
//! ```

use anyhow::Context;
use aptos_crypto::SignatureScheme;
use aptos_sdk::Network;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

use commands::transfer::TransferArgs;

/// Lightweight client for Move-based chains
#[derive(Parser, Debug)]
#[command(name = "aptos-lite")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Node REST URL, overrides the configured network
    #[arg(long, global = true)]
    node_url: Option<String>,

    /// Network: mainnet, testnet, devnet, localnet or a URL
    #[arg(long, global = true)]
    network: Option<Network>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Show ledger info
    Info,
    /// Show an account's sequence number and authentication key
    Account {
        /// Account address
        address: String,
    },
    /// Show an account's balance
    Balance {
        /// Account address
        address: String,
        /// Coin type or fungible asset
        #[arg(long, default_value = commands::query::APTOS_COIN)]
        asset: String,
    },
    /// Transfer coins
    Transfer {
        /// Recipient address
        #[arg(long)]
        to: String,
        /// Amount in octas
        #[arg(long)]
        amount: u64,
        /// Sender private key (hex)
        #[arg(long)]
        key: String,
        /// Key scheme: ed25519 or secp256k1
        #[arg(long, default_value = "ed25519")]
        scheme: SignatureScheme,
        /// Wait until the transaction is committed
        #[arg(long)]
        wait: bool,
    },
    /// Canonicalize a type tag and print its BCS encoding
    ParseType {
        /// Type tag, e.g. vector<u8>
        tag: String,
    },
    /// Print the long and short forms of an address
    Address {
        /// Address hex
        address: String,
    },
    /// Encode an entry-function argument as BCS hex
    EncodeArg {
        /// Move type, e.g. u64 or vector<address>
        #[arg(value_name = "TYPE")]
        ty: String,
        /// Value; lists are comma separated
        value: String,
    },
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the node URL
        #[arg(long)]
        set_node_url: Option<String>,
        /// Set the network
        #[arg(long)]
        set_network: Option<Network>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let json = cli.json;
    if let Err(e) = run(cli).await {
        if json {
            println!(
                "{}",
                serde_json::json!({
                    "error": format!("{:#}", e),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load();
    if let Some(network) = cli.network {
        config.network = network;
        config.node_url = None;
    }
    if let Some(node_url) = cli.node_url {
        config.node_url = Some(node_url);
    }
    tracing::debug!(node_url = config.node_url(), "using node");

    let json = cli.json;
    match cli.command {
        Commands::Info => {
            let client = commands::client(&config)?;
            commands::query::info(&client, json).await?;
        }
        Commands::Account { address } => {
            let client = commands::client(&config)?;
            commands::query::account(&client, &address, json).await?;
        }
        Commands::Balance { address, asset } => {
            let client = commands::client(&config)?;
            commands::query::balance(&client, &address, &asset, json).await?;
        }
        Commands::Transfer {
            to,
            amount,
            key,
            scheme,
            wait,
        } => {
            let client = commands::client(&config)?;
            let args = TransferArgs {
                to,
                amount,
                key,
                scheme,
                wait,
            };
            commands::transfer::run(&client, &config, args, json)
                .await
                .context("transfer failed")?;
        }
        Commands::ParseType { tag } => commands::codec::run_parse_type(&tag, json)?,
        Commands::Address { address } => commands::codec::run_address(&address, json)?,
        Commands::EncodeArg { ty, value } => commands::codec::run_encode_arg(&ty, &value, json)?,
        Commands::Config {
            show,
            set_node_url,
            set_network,
        } => handle_config(show, set_node_url, set_network, json)?,
    }
    Ok(())
}

fn handle_config(
    show: bool,
    set_node_url: Option<String>,
    set_network: Option<Network>,
    json: bool,
) -> anyhow::Result<()> {
    // flags override the file in memory only; edit the stored copy
    let mut config = Config::load();
    let mut modified = false;

    if let Some(network) = set_network {
        config.network = network;
        config.node_url = None;
        modified = true;
    }

    if let Some(node_url) = set_node_url {
        config.node_url = Some(node_url);
        modified = true;
    }

    if modified {
        let path = config.save().context("saving configuration")?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .message(&format!("Configuration saved to {}", path.display()))
            .print();
    } else if show {
        Output::new(json)
            .field("network", &config.network.to_string())
            .field("node_url", config.node_url())
            .field_u64("max_gas_amount", config.max_gas_amount)
            .field_u64("expiration_secs", config.expiration_secs)
            .message(&format!(
                "Network: {}\nNode URL: {}\nMax gas amount: {}\nExpiration: {}s",
                config.network,
                config.node_url(),
                config.max_gas_amount,
                config.expiration_secs
            ))
            .print();
    } else {
        Output::new(json)
            .message("Use --show to display config, or --set-node-url/--set-network to modify")
            .print();
    }

    Ok(())
}
