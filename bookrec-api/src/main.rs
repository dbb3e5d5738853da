//! bookrec-api - Book popularity and similarity lookup service
//!
//! Loads the precomputed recommendation artifacts once, then serves
//! `/popular` and `/recommend` until interrupted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bookrec_api::{build_router, AppState};
use bookrec_common::config::{load_toml_config, locate_config_file, ConfigOverrides, ServiceConfig};
use bookrec_common::ArtifactStore;
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for bookrec-api
#[derive(Parser, Debug)]
#[command(name = "bookrec-api")]
#[command(about = "Book popularity and similarity lookup service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "BOOKREC_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to
    #[arg(long, env = "BOOKREC_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "BOOKREC_PORT")]
    port: Option<u16>,

    /// Directory containing the JSON artifacts
    #[arg(short, long, env = "BOOKREC_MODELS_DIR")]
    models_dir: Option<PathBuf>,

    /// Origin allowed by CORS
    #[arg(long, env = "BOOKREC_ALLOWED_ORIGIN")]
    allowed_origin: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            models_dir: self.models_dir.clone(),
            allowed_origin: self.allowed_origin.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing init so the file can set the log level
    let config_path = locate_config_file(args.config.as_deref());
    let toml_config = config_path
        .as_deref()
        .map(load_toml_config)
        .transpose()
        .context("Failed to load configuration")?;
    let config = ServiceConfig::resolve(toml_config, args.overrides());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "bookrec_api={level},bookrec_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Build identification first, before artifact loading delays
    info!(
        "Starting bookrec-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    match (&config_path, &args.config) {
        (Some(path), _) => info!("Configuration file: {}", path.display()),
        (None, Some(requested)) => warn!(
            "Config file {} does not exist, using defaults",
            requested.display()
        ),
        (None, None) => info!("No config file found, using defaults"),
    }

    info!("Models directory: {}", config.models_dir.display());

    let artifacts = match ArtifactStore::load(&config.models_dir) {
        Ok(artifacts) => {
            info!("✓ Loaded recommendation artifacts");
            artifacts
        }
        Err(e) => {
            error!("Failed to load artifacts: {}", e);
            return Err(e.into());
        }
    };

    let app = build_router(AppState::new(artifacts), &config.allowed_origin)
        .context("Failed to build router")?;
    info!("CORS allowed origin: {}", config.allowed_origin);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("bookrec-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
