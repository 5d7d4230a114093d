//! Runtime initialization and setup

use crate::app::{config::AppConfig, logging::init_logging};
use crate::config::{ConfigLoader, PlannerConfig};
use crate::generation::{GeminiClient, PlanGenerator};
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Load the planner configuration and initialize logging with it.
pub async fn initialize_app(app: AppConfig) -> Result<(AppConfig, PlannerConfig)> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &app.config_path {
        loader = loader.with_path(path);
    }
    let config = loader.load().await?;

    let app = app.with_log_filter(config.log_level.clone());
    init_logging(&app);
    debug!(
        model = %config.generation.model,
        has_api_key = config.generation.api_key.is_some(),
        "Configuration loaded"
    );

    Ok((app, config))
}

/// Build the plan generator backed by the configured Gemini model.
pub fn build_generator(config: &PlannerConfig) -> Result<Arc<PlanGenerator>> {
    let client = GeminiClient::new(&config.generation)?;
    Ok(Arc::new(PlanGenerator::new(Arc::new(client))?))
}
