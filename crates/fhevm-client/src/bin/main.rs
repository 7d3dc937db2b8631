//! fhevm binary: encrypt inputs and talk to a decryption gateway
//!
//! Run with:
//! ```bash
//! cargo run -p fhevm-client --bin fhevm -- --network hardhat encrypt 42
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fhevm_client::fhevm_core::{mock::MockLibrary, network};
use fhevm_client::{create_fhevm_instance, EncryptionType, FhevmConfig, InputValue, Instance};

#[derive(Parser, Debug)]
#[command(name = "fhevm")]
#[command(about = "Encrypt contract inputs and request gateway decryptions")]
struct Args {
    /// JSON config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Network preset (sepolia, localhost, hardhat)
    #[arg(long)]
    network: Option<String>,

    /// Chain ID (defaults to the preset's chain)
    #[arg(long)]
    chain_id: Option<u64>,

    #[arg(long)]
    gateway_url: Option<String>,

    #[arg(long)]
    acl_address: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List supported network presets
    Networks,
    /// Encrypt a value and print the envelope as JSON
    Encrypt {
        value: String,
        /// uint8, uint16, uint32, uint64, bool or address
        #[arg(long = "type")]
        ty: Option<EncryptionType>,
    },
    /// Ask the gateway to decrypt a ciphertext
    Decrypt {
        ciphertext: String,
        contract: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// Allow a user to decrypt a contract's data
    Grant { contract: String, user: String },
    /// Withdraw a granted permission
    Revoke { contract: String, user: String },
    /// Check whether a user may decrypt a contract's data
    Check { contract: String, user: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fhevm_client=info".parse()?))
        .init();

    let args = Args::parse();

    if let Command::Networks = args.command {
        for preset in network::NETWORKS.iter() {
            println!(
                "{:<10} chain {:<9} gateway {}",
                preset.key, preset.chain_id, preset.gateway_url
            );
        }
        return Ok(());
    }

    let config = build_config(&args)?;
    let instance = create_fhevm_instance(Arc::new(MockLibrary::new()), &config).await?;

    run(&instance, args.command).await
}

fn build_config(args: &Args) -> anyhow::Result<FhevmConfig> {
    let mut config = match &args.config {
        Some(path) => FhevmConfig::load(path)?,
        None => FhevmConfig::default(),
    };

    if let Some(name) = &args.network {
        config.network = Some(name.clone());
    }
    if let Some(chain_id) = args.chain_id {
        config.chain_id = chain_id;
    } else if config.chain_id == 0 {
        if let Some(preset) = config.preset() {
            config.chain_id = preset.chain_id;
        }
    }
    if let Some(url) = &args.gateway_url {
        config.gateway_url = Some(url.clone());
    }
    if let Some(acl) = &args.acl_address {
        config.acl_address = Some(acl.clone());
    }

    Ok(config)
}

/// Booleans and integers are taken literally; anything else stays text
fn parse_value(raw: &str) -> InputValue {
    match raw {
        "true" => InputValue::Bool(true),
        "false" => InputValue::Bool(false),
        _ => raw
            .parse::<i128>()
            .map(InputValue::Int)
            .unwrap_or_else(|_| InputValue::Text(raw.to_string())),
    }
}

async fn run(instance: &Instance, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Networks => {}
        Command::Encrypt { value, ty } => {
            let envelope = instance.encrypt(parse_value(&value), ty).await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Command::Decrypt {
            ciphertext,
            contract,
            user,
        } => {
            let value = instance
                .decrypt(ciphertext, &contract, user.as_deref())
                .await?;
            println!("{}", value);
        }
        Command::Grant { contract, user } => {
            instance.grant_access(&contract, &user).await?;
            println!("[OK] granted {} on {}", user, contract);
        }
        Command::Revoke { contract, user } => {
            instance.revoke_access(&contract, &user).await?;
            println!("[OK] revoked {} on {}", user, contract);
        }
        Command::Check { contract, user } => {
            let allowed = instance.has_access(&contract, &user).await;
            println!("{}", allowed);
        }
    }
    Ok(())
}
