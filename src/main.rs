//! whale-watch - Main Entry Point
//!
//! Watches Synthetix PerpsV2 markets for whale trades and posts alerts
//! to a social feed.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use whale_watch::chain::{DeploymentManifest, MarketRegistry, SubscriptionManager};
use whale_watch::classify::{FlavorCorpus, TradeClassifier};
use whale_watch::common::channels;
use whale_watch::config::loader;
use whale_watch::publish::{PublishQueue, TwitterSink};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting whale-watch");
    info!("Configuration file: {}", args.config);

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = loader::load_config(Some(&args.config))?;

    // Resolve the market directory; failing here must abort the process,
    // an incomplete symbol table would misattribute events
    let manifest = DeploymentManifest::from_file(&config.chain.deployment_manifest)
        .map_err(|e| fatal("loading deployment manifest", e))?;
    let registry = MarketRegistry::new(&config.chain.http_url, manifest)?;
    let descriptors = registry
        .resolve()
        .await
        .map_err(|e| fatal("resolving market directory", e))?;

    for descriptor in descriptors.values() {
        info!(symbol = %descriptor.symbol, address = %descriptor.address, "watching market");
    }

    let corpus = FlavorCorpus::new(
        &config.alerts.flavor_long_path,
        &config.alerts.flavor_short_path,
    );
    let classifier = TradeClassifier::new(descriptors.clone(), corpus);

    let sink = TwitterSink::new(&config.twitter.api_url, config.twitter.credentials()?)?;
    let queue = Arc::new(PublishQueue::new(
        Arc::new(sink),
        Duration::from_millis(config.alerts.publish_delay_ms),
    ));

    // Subscriptions feed the trade channel; the loop below consumes it
    let (sender, mut receiver) = channels::create_trade_channel();
    let manager = SubscriptionManager::new(
        &config.chain.ws_url,
        Duration::from_millis(config.alerts.reconnect_delay_ms),
    );
    let _handles = manager.spawn_all(&descriptors, sender);

    let drain_queue = Arc::clone(&queue);
    tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            if let Some(notification) = classifier.classify(&event) {
                drain_queue.enqueue(notification).await;
                let queue = Arc::clone(&drain_queue);
                tokio::spawn(async move { queue.drain().await });
            }
        }
    });

    info!("Application initialized successfully");

    // Keep the application running
    tokio::signal::ctrl_c().await?;
    info!("Received shutdown signal, cleaning up...");

    Ok(())
}

/// Log a fatal startup error before the process exits non-zero
fn fatal(context: &str, err: whale_watch::WatcherError) -> anyhow::Error {
    error!(error = %err, "fatal failure while {context}");
    anyhow::Error::new(err).context(context.to_string())
}
