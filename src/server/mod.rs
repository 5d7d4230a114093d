//! HTTP adapter
//!
//! Exposes plan sessions over a small JSON API. Each session owns its own
//! orchestrator; the handlers only translate between HTTP and transitions.

pub mod routes;
pub mod session;

pub use session::{spawn_sweeper, SessionStore};

use crate::error::{Error, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Serves the plan API on one address.
pub struct PlanServer {
    store: Arc<SessionStore>,
    addr: String,
    session_idle: Duration,
    sweep_every: Duration,
}

impl PlanServer {
    pub fn new(store: Arc<SessionStore>, addr: impl Into<String>) -> Self {
        Self {
            store,
            addr: addr.into(),
            session_idle: Duration::from_secs(3600),
            sweep_every: Duration::from_secs(60),
        }
    }

    /// Drop sessions idle for `idle`, checking every `every`.
    pub fn with_eviction(mut self, idle: Duration, every: Duration) -> Self {
        self.session_idle = idle;
        self.sweep_every = every;
        self
    }

    pub async fn start(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Starting plan API server on {}", listener.local_addr()?);

        let max_idle = chrono::Duration::from_std(self.session_idle)
            .map_err(|e| Error::Config(format!("Invalid session idle limit: {e}")))?;
        let sweeper = spawn_sweeper(self.store.clone(), self.sweep_every, max_idle);

        let served = axum::serve(listener, build_router(self.store)).await;
        sweeper.abort();
        served?;
        Ok(())
    }
}

pub fn build_router(store: Arc<SessionStore>) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health_check))
        .route("/api/v1/plans", post(routes::create_plan))
        .route(
            "/api/v1/plans/{id}",
            get(routes::get_plan).delete(routes::delete_plan),
        )
        .route("/api/v1/plans/{id}/start", post(routes::start_plan))
        .route("/api/v1/plans/{id}/optimize", post(routes::optimize_plan))
        .route("/api/v1/plans/{id}/finalize", post(routes::finalize_plan))
        .route("/api/v1/plans/{id}/evaluate", post(routes::evaluate_plan))
        .route("/api/v1/plans/{id}/reset", post(routes::reset_plan))
        .layer(CorsLayer::permissive())
        .with_state(store)
}
