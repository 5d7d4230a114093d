use super::{get_config_dir, PlannerConfig, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Resolves and reads the configuration file, then applies environment
/// overrides.
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    default_dir: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            explicit_path: None,
            default_dir: get_config_dir().ok(),
        }
    }

    /// Load from this file instead of the platform default. The file must exist.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    pub fn with_default_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.default_dir = Some(dir.into());
        self
    }

    pub async fn load(&self) -> Result<PlannerConfig> {
        let mut config = match self.resolve_path() {
            Some(path) => Self::read_file(&path).await?,
            None => {
                if let Some(path) = &self.explicit_path {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                debug!("No config file found, using defaults");
                PlannerConfig::new()
            }
        };

        config.merge_env_vars();
        Ok(config)
    }

    fn resolve_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.explicit_path {
            return path.exists().then(|| path.clone());
        }

        self.default_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    async fn read_file(path: &Path) -> Result<PlannerConfig> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path).await?;
        PlannerConfig::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
