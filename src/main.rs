//! ChainSentinel - blockchain security dashboard backend
//!
//! Serves AI security analyses (merged from two completion providers),
//! custodial wallet pass-through and TEE status to the dashboard UI.

mod api;
mod config;
mod error;
mod llm;
mod tee;
mod wallet;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Address to listen on (overrides the config file)
    #[arg(short, long)]
    bind: Option<String>,

    /// Write the default config to the config path and exit
    #[arg(long, default_value_t = false)]
    write_config: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if args.write_config {
        let path = args
            .config
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(Config::default_path);
        Config::default()
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let mut config = Config::load(args.config.as_deref()).context("loading config")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    let state = Arc::new(AppState::from_config(&config).context("building services")?);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;
    info!("ChainSentinel listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
