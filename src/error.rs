//! Error types shared by the planner, the optimizer and configuration loading.

use std::time::Duration;

use thiserror::Error;

use crate::session::SessionType;
use crate::tyre::Compound;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid tire usage on set {set_number}: {reason}")]
    InvalidUsage { set_number: u32, reason: String },

    #[error("invalid allocation: {0}")]
    InvalidAllocation(String),

    #[error("insufficient inventory for {session}: no usable {compound} set")]
    InsufficientInventory {
        session: SessionType,
        compound: Compound,
    },

    #[error("no feasible race strategy: {0}")]
    NoFeasibleStrategy(String),

    #[error("lap-time predictor unavailable: {0}")]
    PredictorUnavailable(#[from] PredictorError),

    #[error("unknown track '{0}'")]
    UnknownTrack(String),

    #[error("invalid strategy request: {0}")]
    InvalidRequest(String),
}

/// Failure reported by (or on behalf of) the external lap-time predictor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictorError {
    #[error("prediction timed out after {0:?}")]
    Timeout(Duration),

    #[error("prediction failed: {0}")]
    Failed(String),

    #[error("predictor returned an unusable lap time ({0})")]
    InvalidLapTime(f64),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config rejected: {0}")]
    Invalid(String),
}
