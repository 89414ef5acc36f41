//! `askme` binary: loads configuration, wires the session store, sweeper,
//! model client, and HTTP gateway, and serves until interrupted.

use askme_gateway::GatewayServer;
use askme_model::{GeminiClient, ModelConfig};
use askme_session::{SessionConfig, SessionStore, Sweeper};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "askme", about = "AskMe — multi-modal AI chat backend")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "askme.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Deserialize)]
struct AskMeConfig {
    model: ModelConfig,
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    session: SessionSettings,
}

#[derive(Deserialize)]
struct ServerConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    /// Browser origins allowed by CORS. Empty disables CORS entirely.
    #[serde(default = "default_cors_origins")]
    cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

#[derive(Deserialize)]
struct SessionSettings {
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    #[serde(default = "default_max_history")]
    max_history: usize,
    #[serde(default = "default_max_queries")]
    max_queries: u32,
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_history: default_max_history(),
            max_queries: default_max_queries(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl SessionSettings {
    fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            timeout: chrono::Duration::seconds(self.timeout_secs as i64),
            max_history: self.max_history,
            max_queries: self.max_queries,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:5173".to_string()]
}
fn default_timeout_secs() -> u64 {
    3600
}
fn default_max_history() -> usize {
    10
}
fn default_max_queries() -> u32 {
    5
}
fn default_sweep_interval_secs() -> u64 {
    300
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let config_str = tokio::fs::read_to_string(&cli.config).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to read config file '{}': {}",
            cli.config.display(),
            e
        )
    })?;
    let config: AskMeConfig = toml::from_str(&config_str)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);

            info!("Starting AskMe backend on {}:{}", host, port);

            let sessions = Arc::new(SessionStore::new(config.session.to_session_config()));
            let model = Arc::new(GeminiClient::new(config.model)?);

            let shutdown = CancellationToken::new();
            let sweeper = Sweeper::new(
                sessions.clone(),
                Duration::from_secs(config.session.sweep_interval_secs),
            );
            let sweeper_handle = sweeper.spawn(shutdown.clone());

            let app = GatewayServer::build_with_cors(
                sessions,
                model,
                &config.server.cors_origins,
            );

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("AskMe backend listening on {}", addr);

            let signal = {
                let shutdown = shutdown.clone();
                async move {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        tracing::error!(error = %e, "failed to listen for shutdown signal");
                    }
                    info!("shutdown signal received");
                    shutdown.cancel();
                }
            };

            axum::serve(listener, app)
                .with_graceful_shutdown(signal)
                .await?;

            // Let an in-flight sweep finish before exiting.
            shutdown.cancel();
            sweeper_handle.await?;
            info!("AskMe backend stopped");
        }
    }

    Ok(())
}
