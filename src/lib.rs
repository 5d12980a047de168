//! Tire allocation, session planning and race strategy search for a race weekend.

pub mod allocation;
pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod parallel;
pub mod planner;
pub mod predictor;
pub mod session;
pub mod strategy;
pub mod track;
pub mod tyre;
pub mod weekend;

pub use allocation::{Allocation, AllocationOverride, AllocationPolicy};
pub use config::EngineConfig;
pub use error::{ConfigError, PlanError, PredictorError};
pub use inventory::Inventory;
pub use planner::{SessionPlan, SessionPlanner};
pub use predictor::{LapContext, LapTimePredictor, WeatherFeatures, WeatherSupplier};
pub use session::{SessionType, WeekendFormat};
pub use strategy::{plan_race_strategies, RaceStrategy, Stint, StrategyOptions};
pub use tyre::{Compound, DegradationTable, TireSet};
pub use weekend::{plan_weekend, WeekendPlanner, WeekendStrategy};
