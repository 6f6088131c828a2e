//! Engine Settings Module
//!
//! Runtime knobs for the validator service: where layouts come from, where
//! corrected files go, and how logs are emitted. Loaded from an optional TOML
//! file with `RXFEED_*` environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RegistryError;
use crate::registry::LayoutRegistry;

/// Settings shared by every engine entry point
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EngineSettings {
    /// Directory of layout documents; bundled layouts when unset
    #[serde(default)]
    pub layouts_dir: Option<PathBuf>,

    /// Default directory for corrected output files
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            layouts_dir: None,
            output_dir: None,
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl EngineSettings {
    /// Load settings from `path` (if given) with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading engine settings: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // RXFEED_LAYOUTS_DIR, RXFEED_LOG_LEVEL, ...
        builder = builder.add_source(
            Environment::with_prefix("RXFEED")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build settings")?;

        config
            .try_deserialize()
            .context("Failed to deserialize settings")
    }

    /// Expand `$VAR` references in path values
    pub fn expand_env_vars(&mut self) -> Result<()> {
        if let Some(dir) = &self.layouts_dir {
            let expanded = shellexpand::env(&dir.to_string_lossy())
                .context("Failed to expand layouts_dir")?
                .to_string();
            self.layouts_dir = Some(PathBuf::from(expanded));
        }

        if let Some(dir) = &self.output_dir {
            let expanded = shellexpand::env(&dir.to_string_lossy())
                .context("Failed to expand output_dir")?
                .to_string();
            self.output_dir = Some(PathBuf::from(expanded));
        }

        Ok(())
    }

    /// Registry selected by these settings
    pub fn registry(&self) -> Result<LayoutRegistry, RegistryError> {
        match &self.layouts_dir {
            Some(dir) => {
                debug!("Using layouts from {}", dir.display());
                LayoutRegistry::from_dir(dir)
            }
            None => LayoutRegistry::bundled(),
        }
    }
}

/// Load settings and expand environment references
pub fn load_settings(path: Option<&Path>) -> Result<EngineSettings> {
    let mut settings = EngineSettings::load(path)?;
    settings.expand_env_vars()?;
    Ok(settings)
}
