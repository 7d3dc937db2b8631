//! fhevm-gateway binary: development decryption gateway
//!
//! Run with:
//! ```bash
//! cargo run -p fhevm-gateway -- --port 8545
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fhevm_core::network;
use fhevm_gateway::metrics::init_prometheus_recorder;
use fhevm_gateway::{GatewayConfig, ServerBuilder};

#[derive(Parser, Debug)]
#[command(name = "fhevm-gateway")]
#[command(about = "Development decryption gateway for FHEVM SDK clients")]
struct Args {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Network preset supplying chain id and ACL address
    #[arg(long, default_value = "hardhat")]
    network: String,

    #[arg(long, default_value = "8545")]
    port: u16,

    /// Accept decryption requests from users without a grant
    #[arg(long)]
    no_acl: bool,

    /// Disable the /metrics endpoint
    #[arg(long)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fhevm_gateway=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GatewayConfig::load(path)?,
        None => {
            let preset = network::lookup_by_name(&args.network)
                .ok_or_else(|| anyhow::anyhow!("Unknown network: {}", args.network))?;
            GatewayConfig::for_network(preset)
        }
    };
    if args.no_acl {
        config.enforce_acl = false;
    }

    let mut builder = ServerBuilder::new(config).port(args.port);
    if !args.no_metrics {
        builder = builder.prometheus(init_prometheus_recorder()?);
    }

    let server = builder.build()?;
    tracing::info!(port = args.port, "Gateway ready");
    server.run().await?;

    Ok(())
}
