//! CLI configuration file

use anyhow::{Context, Result};
use rollcred_core::parser::DEFAULT_VERSION_TOKEN;
use rollcred_core::{ParseOptions, PlaybackConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Font settings for the monospace metrics provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            char_width: 14.0,
            line_height: 36.0,
        }
    }
}

/// Everything the `rollcred` binary can read from `--config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Folder searched for `<script_name>.txt`
    pub folder: PathBuf,
    /// Script played when no path or name is given
    pub script_name: String,
    /// Value substituted for `version_token`
    pub version: Option<String>,
    pub version_token: String,
    pub metrics: MetricsConfig,
    pub playback: PlaybackConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("data"),
            script_name: "Credits".to_string(),
            version: None,
            version_token: DEFAULT_VERSION_TOKEN.to_string(),
            metrics: MetricsConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl CliConfig {
    /// Reads the config file if one is given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.playback.validate().context("Invalid playback settings")?;
        let valid = |v: f32| v.is_finite() && v >= 0.0;
        if !valid(self.metrics.char_width) || !valid(self.metrics.line_height) {
            anyhow::bail!(
                "Invalid metrics: char_width={} line_height={}",
                self.metrics.char_width,
                self.metrics.line_height
            );
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            version_token: self.version_token.clone(),
            version: self.version.clone(),
        }
    }

    /// Path of the script to load: an explicit path wins, then `name`, then
    /// the configured default name inside `folder`
    pub fn script_path(&self, explicit: Option<&Path>, name: Option<&str>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        let name = name.unwrap_or(&self.script_name);
        self.folder.join(format!("{}.txt", name))
    }
}
