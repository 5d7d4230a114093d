//! Application configuration
//!
//! Process-level settings from the command line, as opposed to the
//! planner settings loaded from the config file.

use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Config file given with `--config`
    pub config_path: Option<PathBuf>,
    /// Log filter from the config file or `CITYFORGE_LOG_LEVEL`
    pub log_filter: Option<String>,
}

impl AppConfig {
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    pub fn with_log_filter(mut self, filter: Option<String>) -> Self {
        self.log_filter = filter;
        self
    }

    /// Get the log filter based on verbosity. An explicit `-v` wins over the
    /// configured filter.
    pub fn log_level(&self) -> String {
        match (self.verbose, &self.log_filter) {
            (0, Some(filter)) => filter.clone(),
            (0, None) => "info".to_string(),
            (1, _) => "debug".to_string(),
            (2, _) => "trace".to_string(),
            _ => "trace,hyper=debug,tower=debug".to_string(),
        }
    }
}
