//! C9 Redemption Calculator CLI
//!
//! Computes the redeemable token amounts of one or many C9 liquidity
//! receipts against the Radix Gateway and prints them as JSON.

use anyhow::Result;
use c9_redemption::config::{LoggingConfig, Network, RedemptionConfig};
use c9_redemption::{GatewayClient, RedemptionService};
use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "c9-redemption")]
#[command(about = "Redemption values of C9 liquidity receipts")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "c9-redemption.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Override the Radix network
    #[arg(long, value_enum)]
    network: Option<Network>,

    /// Override the gateway URL
    #[arg(long)]
    gateway_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Redemption value of a single receipt
    Single {
        /// C9 pool component address
        #[arg(long)]
        component: String,

        /// Receipt non-fungible id, e.g. "#42#"
        #[arg(long)]
        nft_id: String,

        /// Ledger state version to read at (latest if omitted)
        #[arg(long)]
        state_version: Option<u64>,
    },
    /// Redemption values of many receipts; failed receipts are omitted
    Batch {
        /// C9 pool component address
        #[arg(long)]
        component: String,

        /// Comma separated receipt ids
        #[arg(long, value_delimiter = ',', required = true)]
        nft_ids: Vec<String>,

        /// Ledger state version to read at (latest if omitted)
        #[arg(long)]
        state_version: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = Path::new(&cli.config).exists();
    let mut config = if config_found {
        RedemptionConfig::from_file(&cli.config)?
    } else {
        RedemptionConfig::default()
    };

    if let Some(log_level) = cli.log_level {
        config.logging.level = log_level;
    }
    if let Some(network) = cli.network {
        config.gateway.network = network;
    }
    if let Some(url) = cli.gateway_url {
        config.gateway.url = Some(url);
    }
    config.check()?;

    init_logging(&config.logging);
    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config);
    }
    info!("Gateway endpoint: {}", config.gateway.base_url());

    let gateway = GatewayClient::new(&config.gateway)?;
    let service = RedemptionService::new(Arc::new(gateway), config.fetch.clone());

    let output = match cli.command {
        Command::Single {
            component,
            nft_id,
            state_version,
        } => {
            let amounts = service
                .calculate_redemption_value(&component, &nft_id, state_version)
                .await?;
            serde_json::to_string_pretty(&amounts)?
        }
        Command::Batch {
            component,
            nft_ids,
            state_version,
        } => {
            let results = service
                .calculate_redemption_values(&component, &nft_ids, state_version)
                .await?;
            serde_json::to_string_pretty(&results)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn init_logging(config: &LoggingConfig) {
    let log_level = config
        .level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("c9_redemption={}", log_level).into());

    // Logs go to stderr so stdout stays clean JSON
    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
