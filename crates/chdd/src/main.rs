//! CHD Daemon - web front end for the CHD risk predictor
//!
//! Loads the pipeline artifact once, then serves the assessment form until
//! interrupted. A missing or incompatible artifact stops startup.

use anyhow::{Context, Result};
use chd_common::{Config, RiskPredictor};
use chdd::server::{self, AppState};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chdd", version, about = "CHD risk assessment web daemon")]
struct Args {
    /// Config file (overrides discovery)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Pipeline artifact (overrides config and $CHD_MODEL_PATH)
    #[arg(long, value_name = "PATH")]
    model: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:8501
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("[BOOT] chdd v{} starting", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(model) = args.model {
        config.model.path = model;
    }
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }

    info!("[BOOT] Loading model from {}", config.model.path.display());
    let predictor = match RiskPredictor::load(&config.model.path) {
        Ok(predictor) => predictor,
        Err(e) => {
            error!("[FATAL] {}", e);
            std::process::exit(1);
        }
    };
    info!(
        "[BOOT] Model ready: {} ({})",
        predictor.metadata().name,
        predictor.metadata().algorithm
    );

    server::run(AppState::new(predictor, config)).await
}
