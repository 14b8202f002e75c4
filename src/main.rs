//! Parking Ledger
//!
//! Line-oriented command interpreter for parking lots: reads commands from
//! stdin, replies on stdout and logs to stderr.
//!
//! Usage: `parking-ledger [CONFIG_FILE]`

mod command;
mod dispatcher;

use std::io;

use anyhow::Context;
use parking_core::config::LogConfig;
use parking_core::AppConfig;
use parking_services::ParkingRegistry;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::dispatcher::Dispatcher;

/// Initialize tracing/logging
fn init_tracing(log: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parking_ledger={0},parking_services={0},parking_core={0}",
            log.level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if log.json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // An explicit config file path replaces the default lookup
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_file(&path)
            .with_context(|| format!("failed to load configuration from {}", path))?,
        None => AppConfig::load().context("failed to load configuration")?,
    };

    init_tracing(&config.log);

    info!(
        max_lots = config.parking.max_lots,
        output = ?config.output.format,
        "Starting Parking Ledger v{}",
        env!("CARGO_PKG_VERSION")
    );

    let registry = ParkingRegistry::with_limits(&config.parking);
    let mut dispatcher = Dispatcher::new(registry, config.output.format);

    let stdin = io::stdin();
    let stdout = io::stdout();
    dispatcher
        .run(stdin.lock(), stdout.lock())
        .context("command loop failed")?;

    info!(
        lots = dispatcher.registry().lots().len(),
        "Parking Ledger stopped"
    );
    Ok(())
}
