#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::net::SocketAddr;
use std::sync::Arc;

use args::Args;
use async_trait::async_trait;
use clap::Parser;
use plateful_config::Config;
use plateful_llm::LlmClient;
use plateful_plan::memory::{MemoryPlanStore, MemoryPreferencesStore};
use plateful_plan::{ActionType, AnalyticsSink, MealPlanGenerator, PlanService};
use plateful_server::{AppState, Server};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging; RUST_LOG wins over the configured filter
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.telemetry.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        config_path = %args.config.display(),
        "starting plateful"
    );

    let listen_address: SocketAddr = match args.listen {
        Some(address) => address,
        None => config.server.listen.parse()?,
    };

    // Wire the plan service to the in-memory stores
    let client = LlmClient::from_config(&config.llm);
    let plans = Arc::new(PlanService::new(
        MealPlanGenerator::new(client.clone()),
        Arc::new(MemoryPreferencesStore::new()),
        Arc::new(MemoryPlanStore::new()),
    ));

    let state = AppState {
        plans,
        llm: Arc::new(client),
        analytics: Arc::new(TracingAnalytics),
    };

    let server = Server::new(listen_address, state);

    // Set up graceful shutdown
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown_clone.cancel();
    });

    // Run server
    server.serve(shutdown).await?;

    tracing::info!("plateful stopped");
    Ok(())
}

/// Analytics sink that writes events to the log
struct TracingAnalytics;

#[async_trait]
impl AnalyticsSink for TracingAnalytics {
    async fn log_event(
        &self,
        user_id: &str,
        action: ActionType,
        metadata: Option<serde_json::Value>,
    ) {
        tracing::info!(user_id, ?action, ?metadata, "analytics event");
    }
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
