//! `onionfix`: writes files of synthetic onion addresses for load and attack
//! test fixtures.
//!
//! ```bash
//! onionfix --v2 --v3 --num-addr 20000 --output-dir ./attack_addr/
//! ```
//!
//! Produces `v2_0000.addr` .. `v2_0003.addr` and `v3_0000.addr` ..
//! `v3_0003.addr`, 5000 newline-separated addresses each.

mod config;
mod sink;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, RunConfig};
use onionfix::Dispatcher;
use sink::FileSink;
use std::sync::Arc;
use telemetry::init_tracing;
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = RunConfig::try_from(args)?;

    init_tracing(config.log_format);
    log_startup_info(&config);

    let sink = FileSink::create(&config.output_dir).with_context(|| {
        format!(
            "could not create output directory {}",
            config.output_dir.display()
        )
    })?;
    let dispatcher = Dispatcher::new(config.plan())?;

    let signals = tokio::spawn(shutdown_signal(dispatcher.cancellation_token()));
    let result = dispatcher.run(Arc::new(sink)).await;
    signals.abort();

    let _report = result.context("address generation failed")?;

    #[cfg(feature = "tracing")]
    tracing::info!("Wrote {} to {}", _report, config.output_dir.display());
    Ok(())
}

fn log_startup_info(_config: &RunConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!("Starting address generation with full config: {:#?}", _config);
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Generating {} addresses per version ({:?}) with up to {} workers",
            _config.num_addr,
            _config.versions,
            _config.max_workers
        );
    }
}

/// Cancels `token` on Ctrl+C or SIGTERM so in-flight workers stop before
/// writing further shards.
async fn shutdown_signal(token: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Failed to install SIGTERM handler: {_e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }

    #[cfg(feature = "tracing")]
    tracing::warn!("Cancelling remaining workers; shards already written are kept");
    token.cancel();
}
