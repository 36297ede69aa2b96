//! Eclipse oracle feed reader - Entry Point

use anyhow::Result;
use clap::Parser;
use eclipse_cli::{execute, AppConfig, Cli};
use eclipse_feed::FeedService;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config comes first: it carries the logging settings.
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    eclipse_telemetry::init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        network = %config.client.network,
        base_url = %config.client.base_url,
        rpc_url = %config.client.rpc_url,
        "Configuration loaded"
    );

    let service = FeedService::from_config(&config.client)?;
    let output = execute(&cli.command, &config, &service).await?;
    println!("{output}");

    Ok(())
}
