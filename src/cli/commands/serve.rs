//! `cityforge serve`

use crate::app::build_generator;
use crate::config::PlannerConfig;
use crate::server::{PlanServer, SessionStore};
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

pub async fn run_serve_command(
    mut config: PlannerConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let generator = build_generator(&config)?;
    let store = Arc::new(SessionStore::new(generator));
    PlanServer::new(store, config.server_addr())
        .with_eviction(
            Duration::from_secs(config.server.session_idle_secs),
            Duration::from_secs(config.server.sweep_interval_secs.max(1)),
        )
        .start()
        .await?;
    Ok(())
}
