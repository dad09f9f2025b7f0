use alloy::primitives::{Address, TxHash};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use enterl2_sdk::blockchain::wallet::{Wallet, PRIVATE_KEY_ENV_VAR};
use enterl2_sdk::config::{load_config, presets};
use enterl2_sdk::observability::logging;
use enterl2_sdk::{Client, EnterL2Config};

#[derive(Parser)]
#[command(name = "enterl2-cli")]
#[command(about = "Command line client for the Enter L2 network", long_about = None)]
struct Cli {
    /// TOML configuration file (overrides --network)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network preset: mainnet, testnet or local
    #[arg(short, long, default_value = "testnet")]
    network: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show chain ID, block height and gas price
    Info,
    /// Show a balance (defaults to the connected account)
    Balance {
        #[arg(long)]
        address: Option<Address>,
        /// Token symbol or contract address
        #[arg(long)]
        token: Option<String>,
    },
    /// Look up a transaction by hash
    Tx { hash: TxHash },
    /// Wait for a transaction to be confirmed
    Wait {
        hash: TxHash,
        #[arg(long)]
        confirmations: Option<u64>,
        /// Timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Send a payment from the connected account
    Send {
        to: Address,
        /// Decimal amount in token units, e.g. 1.5
        amount: String,
        /// Token symbol or contract address
        #[arg(long)]
        token: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    logging::init(&config.observability)?;

    let mut client = Client::new(config)?;
    if let Some(wallet) = Wallet::from_env(client.config().network.chain_id)? {
        client.connect_wallet(wallet);
    }

    let outcome = run(&client, cli.command).await;
    client.close().await?;
    outcome
}

async fn run(client: &Client, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Info => {
            print_json(&client.get_network_info().await?)?;
        }
        Commands::Balance { address, token } => {
            let token = token.map(|t| resolve_token(client, &t)).transpose()?;
            let balance = match address {
                Some(address) => client.balance_of(address, token).await?,
                None => client.get_balance(token).await?,
            };
            println!("{}", client.format_amount(balance, token).await?);
        }
        Commands::Tx { hash } => {
            print_json(&client.find_transaction(hash).await?)?;
        }
        Commands::Wait {
            hash,
            confirmations,
            timeout,
        } => {
            let tx = client
                .wait_for_transaction(hash, confirmations, timeout.map(Duration::from_secs))
                .await?;
            print_json(&tx)?;
        }
        Commands::Send {
            to,
            amount,
            token,
            description,
        } => {
            if !client.is_connected() {
                return Err(format!("set {} to send payments", PRIVATE_KEY_ENV_VAR).into());
            }
            let token = token.map(|t| resolve_token(client, &t)).transpose()?;
            let amount = client.parse_amount(&amount, token).await?;
            print_json(&client.send_payment(to, amount, token, description).await?)?;
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<EnterL2Config, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.config {
        return Ok(load_config(path)?);
    }
    presets::by_name(&cli.network)
        .ok_or_else(|| format!("Unknown network preset: {}", cli.network).into())
}

fn resolve_token(client: &Client, token: &str) -> Result<Address, Box<dyn std::error::Error>> {
    if let Ok(address) = token.parse::<Address>() {
        return Ok(address);
    }
    client
        .token_address(token)
        .ok_or_else(|| format!("Unknown token: {}", token).into())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
