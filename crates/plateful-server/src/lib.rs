//! HTTP surface for plan generation and raw completions
//!
//! Thin axum layer over the plan service and the completion client.
//! Identity arrives pre-resolved in the `X-User-Id` header; everything
//! else is JSON in, JSON (or SSE) out, with domain errors rendered as
//! `{ "error": { "message", "type" } }` bodies.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod chat;
mod error;
mod health;
mod identity;
mod models;
mod plans;
mod state;

use std::net::SocketAddr;

use axum::{Router, routing};
use tower_http::trace::TraceLayer;

pub use identity::USER_ID_HEADER;
pub use state::AppState;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the router around the shared state
    pub fn new(listen_address: SocketAddr, state: AppState) -> Self {
        let router = Router::new()
            .route("/health", routing::get(health::health_handler))
            .route("/api/meal-plans/current", routing::get(plans::current_plan))
            .route("/api/meal-plans", routing::post(plans::generate_plan))
            .route("/api/chat/stream", routing::post(chat::chat_stream))
            .route("/api/models", routing::get(models::list_models))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        Self {
            router,
            listen_address,
        }
    }

    /// Address the server will bind to
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
