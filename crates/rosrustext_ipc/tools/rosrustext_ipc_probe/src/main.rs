use std::sync::Arc;

use anyhow::{Context, Result};
use rosrustext_ipc::logging::TracingLogSink;
use rosrustext_ipc_probe::config::Config;
use rosrustext_ipc_probe::probe;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_args().context("read probe configuration")?;

    info!(
        "probe started topic={} subscriptions={} messages={} history={:?} buffer_type={:?}",
        config.topic,
        config.subscriptions,
        config.messages,
        config.ipc.history,
        config.ipc.buffer_type
    );

    let report = probe::run(&config, Arc::new(TracingLogSink)).await?;

    for (slot, (consumed, evicted)) in report.consumed.iter().zip(&report.evicted).enumerate() {
        info!("subscription {slot}: consumed={consumed} evicted={evicted}");
    }
    info!("shutdown");
    Ok(())
}
