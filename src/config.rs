// SPDX-License-Identifier: GPL-3.0-only

use crate::app::state::ScanMode;
use crate::constants::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_INDICATOR_FPS, DEFAULT_INDICATOR_PERIOD,
    DEFAULT_PERMISSION_TIMEOUT, MAX_INDICATOR_FPS,
};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Shortest indicator sweep accepted from configuration
const MIN_INDICATOR_PERIOD_MS: u64 = 100;

/// Shortest permission timeout accepted from configuration
const MIN_PERMISSION_TIMEOUT_MS: u64 = 100;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mode selected when the scan screen opens
    pub default_mode: ScanMode,
    /// Duration of one indicator sweep in milliseconds
    pub indicator_period_ms: u64,
    /// Indicator refresh rate
    pub indicator_fps: u32,
    /// How long to wait for the camera permission prompt, in milliseconds
    pub permission_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_mode: ScanMode::default(),
            indicator_period_ms: DEFAULT_INDICATOR_PERIOD.as_millis() as u64,
            indicator_fps: DEFAULT_INDICATOR_FPS,
            permission_timeout_ms: DEFAULT_PERMISSION_TIMEOUT.as_millis() as u64,
        }
    }
}

impl Config {
    /// Location of the user's config file, if a config directory exists
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`, or from the default location when `None`
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) => Self::load_from(&path),
                None => {
                    debug!("No config directory, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Config loaded");
        Ok(config.sanitized())
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Clamp out-of-range values
    pub fn sanitized(mut self) -> Self {
        if self.indicator_period_ms < MIN_INDICATOR_PERIOD_MS {
            warn!(
                value = self.indicator_period_ms,
                min = MIN_INDICATOR_PERIOD_MS,
                "indicator_period_ms too small, clamping"
            );
            self.indicator_period_ms = MIN_INDICATOR_PERIOD_MS;
        }
        if self.indicator_fps == 0 || self.indicator_fps > MAX_INDICATOR_FPS {
            let clamped = self.indicator_fps.clamp(1, MAX_INDICATOR_FPS);
            warn!(
                value = self.indicator_fps,
                clamped, "indicator_fps out of range, clamping"
            );
            self.indicator_fps = clamped;
        }
        if self.permission_timeout_ms < MIN_PERMISSION_TIMEOUT_MS {
            warn!(
                value = self.permission_timeout_ms,
                min = MIN_PERMISSION_TIMEOUT_MS,
                "permission_timeout_ms too small, clamping"
            );
            self.permission_timeout_ms = MIN_PERMISSION_TIMEOUT_MS;
        }
        self
    }

    pub fn indicator_period(&self) -> Duration {
        Duration::from_millis(self.indicator_period_ms)
    }

    /// Time between two indicator frames
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.indicator_fps.max(1)
    }

    pub fn permission_timeout(&self) -> Duration {
        Duration::from_millis(self.permission_timeout_ms)
    }
}
