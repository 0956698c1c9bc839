use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cricket_stats::analytics::AnalyticsEngine;
use cricket_stats::api::{build_router, cors_layer, state::AppState};
use cricket_stats::auth::{hash_token, AccessControl};
use cricket_stats::config::AppConfig;
use cricket_stats::storage::{RecordStore, StorageConfig, StoreHandle};

#[derive(Parser)]
#[command(name = "cricket-stats")]
#[command(about = "Cricket player and performance tracker with leaderboard analytics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the analytics summary as JSON
    Summary,

    /// Print the SHA-256 digest of a token for the config file
    HashToken {
        token: String,
    },
}

fn init_tracing(log_level: &str, json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();
}

fn build_engine(store: &StoreHandle, config: &AppConfig) -> AnalyticsEngine {
    let engine = AnalyticsEngine::new(Arc::new(store.clone()));
    match config.analytics.fetch_timeout() {
        Some(limit) => engine.with_fetch_timeout(limit),
        None => engine,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::HashToken { token } => {
            println!("{}", hash_token(&token));
            return Ok(());
        }
        command => command,
    };

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting cricket-stats v{}", env!("CARGO_PKG_VERSION"));

    let store = RecordStore::open(StorageConfig::new(config.data_dir.clone()))
        .with_context(|| format!("opening data directory {:?}", config.data_dir))?;
    let store = StoreHandle::new(store);
    let engine = build_engine(&store, &config);

    match command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            if config.auth.tokens.is_empty() {
                tracing::warn!("No API tokens configured; all mutations will be rejected");
            }

            let cors = cors_layer(&config.server.cors_origin)
                .with_context(|| format!("invalid cors_origin {:?}", config.server.cors_origin))?;
            let state = AppState::new(store, AccessControl::new(config.auth.tokens.clone()))
                .with_engine(engine);
            let app = build_router(state).layer(cors);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Summary => {
            let summary = engine.compute_summary().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::HashToken { .. } => {}
    }

    Ok(())
}
