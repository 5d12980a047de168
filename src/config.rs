//! Engine configuration, loaded from JSON or YAML.
//!
//! Every section has defaults, so a missing file means "run with defaults". A
//! file that exists but does not parse or validate is an error.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::allocation::AllocationPolicy;
use crate::error::ConfigError;
use crate::planner::SessionSchedule;
use crate::predictor::ReferencePaceModel;
use crate::strategy::StrategyOptions;
use crate::track::TrackProfile;
use crate::tyre::DegradationTable;

pub const DEFAULT_CONFIG_PATH: &str = "config/tyrestrat.json";
pub const CONFIG_PATH_ENV: &str = "TYRESTRAT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    pub timeout_ms: u64,
    /// Parameters for the built-in reference model; the base lap time is taken
    /// from the track profile.
    pub reference: ReferencePaceModel,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            reference: ReferencePaceModel::default(),
        }
    }
}

impl PredictorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub degradation: DegradationTable,
    pub allocation: AllocationPolicy,
    pub sessions: SessionSchedule,
    pub strategy: StrategyOptions,
    pub predictor: PredictorConfig,
    pub tracks: Vec<TrackProfile>,
    /// Scoring threads; 0 defers to `strategy.workers`.
    pub workers: usize,
}

impl EngineConfig {
    /// Strategy options with the top-level worker count applied.
    pub fn strategy_options(&self) -> StrategyOptions {
        let mut options = self.strategy.clone();
        if self.workers != 0 {
            options.workers = self.workers;
        }
        options
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.degradation.validate().map_err(ConfigError::Invalid)?;
        self.sessions.validate().map_err(ConfigError::Invalid)?;
        self.strategy
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if self.predictor.timeout_ms == 0 {
            return Err(ConfigError::Invalid("predictor.timeout_ms must be > 0".to_string()));
        }
        for track in &self.tracks {
            if track.total_laps == 0 {
                return Err(ConfigError::Invalid(format!("track '{}' has no laps", track.id)));
            }
        }
        Ok(())
    }
}

/// Parse and validate the config at `path`; YAML when the extension is
/// `.yaml`/`.yml`, JSON otherwise.
pub fn load_config(path: &str) -> Result<EngineConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let is_yaml = matches!(
        Path::new(path).extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    let config: EngineConfig = if is_yaml {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };
    config.validate()?;
    Ok(config)
}

/// Config from `TYRESTRAT_CONFIG` or the default path; defaults when the file
/// does not exist.
pub fn load_config_or_default() -> Result<EngineConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    if !Path::new(&path).exists() {
        tracing::debug!(%path, "no config file; using defaults");
        return Ok(EngineConfig::default());
    }
    load_config(&path)
}
