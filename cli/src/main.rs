use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use custom_account_aa_core::{
    CustomSmartAccount, CustomSmartAccountParams, create_custom_smart_account,
    smart_account::AccountCalls,
};
use custom_account_core::{
    rpc::{RpcChain, RpcChainConfig},
    signer::{LocalOwner, SignableMessage},
};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::{CliConfig, LogFormat};

#[derive(Parser)]
#[command(name = "custom-account")]
#[command(about = "Inspect and drive an ERC-4337 custom smart account", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the assembled account as JSON
    Describe,

    /// Print the init code for the next operation (0x once deployed)
    InitCode,

    /// Encode account call data for one call object or an array of calls
    EncodeCalls {
        /// JSON file with `{ "to", "value", "data" }` or an array of them
        #[arg(short, long)]
        calls: PathBuf,
    },

    /// Print the account's current EntryPoint nonce
    Nonce,

    /// Sign a text message with the account owner
    SignMessage {
        #[arg(short, long)]
        message: String,
    },
}

fn init_tracing(log_format: LogFormat, verbose: u8) {
    let default_filter = match verbose {
        0 => "custom_account_cli=info,custom_account_aa_core=debug,custom_account_core=info",
        1 => "custom_account_cli=debug,custom_account_aa_core=debug,custom_account_core=debug",
        _ => "custom_account_cli=trace,custom_account_aa_core=trace,custom_account_core=trace",
    };

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()));

    match log_format {
        LogFormat::Json => subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => subscriber
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn build_account(config: &CliConfig) -> anyhow::Result<CustomSmartAccount<RpcChain, LocalOwner>> {
    let chain = RpcChainConfig {
        rpc_url: &config.rpc.url,
    }
    .to_chain()?;

    let owner = LocalOwner::from_private_key(&config.account.owner_private_key)?;

    let entrypoint = config.account.entrypoint_details();
    tracing::debug!(
        entrypoint = %entrypoint.entrypoint_address,
        version = %entrypoint.version,
        "Resolved EntryPoint"
    );

    let mut params = CustomSmartAccountParams::new(
        owner,
        config.account.factory_address,
        entrypoint.entrypoint_address,
    )
    .with_entrypoint_details(entrypoint)
    .with_index(config.account.index());

    if let Some(address) = config.account.address {
        params = params.with_address(address);
    }

    let account = create_custom_smart_account(chain, params).await?;

    tracing::info!(
        address = %account.address(),
        chain_id = account.chain_id(),
        "Account ready"
    );

    Ok(account)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::get_config()?;

    init_tracing(config.log_format, cli.verbose);

    let account = build_account(&config).await?;

    match cli.command {
        Commands::Describe => {
            println!("{}", serde_json::to_string_pretty(&account.descriptor())?);
        }
        Commands::InitCode => {
            println!("{}", account.get_init_code().await?);
        }
        Commands::EncodeCalls { calls } => {
            let raw = std::fs::read_to_string(&calls)
                .with_context(|| format!("Failed to read {}", calls.display()))?;
            let calls: AccountCalls =
                serde_json::from_str(&raw).context("Failed to parse calls JSON")?;

            println!("{}", account.encode_call_data(&calls)?);
        }
        Commands::Nonce => {
            println!("{}", account.get_nonce().await?);
        }
        Commands::SignMessage { message } => {
            let signature = account
                .sign_message(&SignableMessage::Text(message))
                .await?;
            println!("{signature}");
        }
    }

    Ok(())
}
