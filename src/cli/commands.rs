//! Command implementations for the binary

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::alert::{AlertDispatcher, TelegramChannel};
use crate::chain::ChainClient;
use crate::config::Config;
use crate::dexscreener::DexScreenerSource;
use crate::scheduler::PollScheduler;
use crate::screen::{ScreeningPipeline, VolumeTrendStore};

/// Wire everything together and run the poll loop until shutdown
pub async fn start(config: &Config) -> Result<()> {
    info!("Starting memescout on chain '{}'", config.source.chain_id);

    let source = DexScreenerSource::new(config.source.clone())?;
    let intel = Arc::new(ChainClient::new(&config.chain)?);
    let store = Arc::new(VolumeTrendStore::new(
        config.screening.volume_pump_multiple,
    ));

    let pipeline = Arc::new(ScreeningPipeline::from_config(
        &config.screening,
        intel,
        store,
    ));
    info!("Screening pipeline armed with {} gates", pipeline.gate_count());

    let channel = TelegramChannel::new(&config.telegram)?;
    let dispatcher = Arc::new(AlertDispatcher::new(
        Box::new(channel),
        config.telegram.suppress_repeat_alerts,
    ));

    let scheduler = PollScheduler::new(
        Box::new(source),
        pipeline,
        dispatcher,
        Duration::from_secs(config.scheduler.poll_interval_secs),
    );

    scheduler.run().await?;
    info!("Shutdown complete");
    Ok(())
}

/// Print the active configuration with secrets masked
pub fn show_config(config: &Config) -> Result<()> {
    println!("{}", config.masked_display());
    Ok(())
}

/// Probe the source provider and the notification channel
pub async fn health(config: &Config) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.source.request_timeout_secs))
        .build()?;

    let url = format!("{}/token-profiles/latest/v1", config.source.base_url);
    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => println!("DexScreener: OK"),
        Ok(resp) => println!("DexScreener: HTTP {}", resp.status()),
        Err(e) => println!("DexScreener: unreachable ({})", e),
    }

    let channel = TelegramChannel::new(&config.telegram)?;
    match channel.check_credentials().await {
        Ok(()) => println!("Telegram: OK"),
        Err(e) => println!("Telegram: {}", e),
    }

    Ok(())
}
