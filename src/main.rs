use std::sync::Arc;

use clap::Parser;
use log::{info, warn};

use chain_message_relay::chain::{BlockMonitor, BlockMonitorConfig, RpcClient};
use chain_message_relay::config::AppConfig;
use chain_message_relay::dispatcher::{DispatchConfig, ResponseDispatcher};
use chain_message_relay::generation::GenerationClient;
use chain_message_relay::logging::init_logging;
use chain_message_relay::models::Account;

/// Relays text messages embedded in on-chain transactions through a
/// text-generation service and back to their senders.
#[derive(Parser)]
#[command(name = "relay", version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Print a sample configuration file and exit
    #[arg(long)]
    sample_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.sample_config {
        println!("{}", AppConfig::generate_sample_config()?);
        return Ok(());
    }
    if let Some(path) = cli.config {
        std::env::set_var("CONFIG_FILE", path);
    }

    // Missing or invalid configuration aborts before the monitor starts
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    let rpc_client = Arc::new(RpcClient::new_with_config(
        config.rpc.endpoint.clone(),
        config.rpc.timeout_seconds,
    ));
    let account = Account::new(&config.account.address)?;

    info!("Connected with address: {}", account.address);
    match rpc_client.get_balance(&account.address).await {
        Ok(balance) => info!("Current balance: {} wei", balance),
        Err(e) => warn!("Could not fetch balance: {}", e),
    }

    let generator = Arc::new(GenerationClient::new(
        config.generation.endpoint.clone(),
        config.generation.api_key.clone(),
        config.generation.model.clone(),
    ));

    let dispatcher = ResponseDispatcher::new(
        Arc::clone(&rpc_client),
        generator,
        account.clone(),
        DispatchConfig {
            gas_limit: config.relay.gas_limit,
            gas_premium_wei: config.relay.gas_premium_wei as u128,
            max_tokens: config.generation.max_tokens,
            system_prompt: config.generation.system_prompt.clone(),
        },
    );

    let monitor = BlockMonitor::new(
        rpc_client,
        dispatcher,
        &account,
        Some(BlockMonitorConfig {
            poll_interval_seconds: config.relay.poll_interval_seconds,
        }),
    );

    info!("Monitoring messages for address: {}", account.address);
    match monitor.status().await {
        Ok(status) => info!(
            "Chain head at block {}, {} behind, {} messages relayed",
            status.latest_block, status.blocks_behind, status.messages_relayed
        ),
        Err(e) => warn!("Could not fetch chain status: {}", e),
    }
    monitor.run().await?;

    Ok(())
}
