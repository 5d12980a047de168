//! Interfaces to the lap-time predictor and weather supplier.
//!
//! Both are external collaborators: the engine passes context through to the
//! predictor and never interprets weather values itself.

pub mod reference;
pub mod timeout;

use serde::{Deserialize, Serialize};

use crate::error::PredictorError;
use crate::tyre::Compound;

pub use reference::ReferencePaceModel;
pub use timeout::TimeoutPredictor;

/// Ambient conditions in the shape the lap-time regression is fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherFeatures {
    pub temp_c: f64,
    pub wind_kph: f64,
    pub humidity: f64,
    pub precip_mm: f64,
    pub vis_km: f64,
    pub cloud: f64,
    pub gust_kph: f64,
}

impl Default for WeatherFeatures {
    fn default() -> Self {
        Self {
            temp_c: 25.0,
            wind_kph: 10.0,
            humidity: 50.0,
            precip_mm: 0.0,
            vis_km: 10.0,
            cloud: 25.0,
            gust_kph: 15.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LapContext {
    pub fuel_load_kg: f64,
    pub weather: WeatherFeatures,
}

/// Fuel carried at the start of each race lap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelModel {
    pub initial_kg: f64,
    pub burn_per_lap_kg: f64,
}

impl Default for FuelModel {
    fn default() -> Self {
        Self {
            initial_kg: 100.0,
            burn_per_lap_kg: 2.5,
        }
    }
}

impl FuelModel {
    /// Fuel on board at the start of race lap `lap` (0-based), never negative.
    pub fn load_at(&self, lap: u32) -> f64 {
        (self.initial_kg - self.burn_per_lap_kg * f64::from(lap)).max(0.0)
    }
}

pub trait LapTimePredictor: Send + Sync {
    /// Predicted lap time in seconds.
    fn predict_lap_time(
        &self,
        compound: Compound,
        tire_age_laps: u32,
        context: &LapContext,
    ) -> Result<f64, PredictorError>;

    /// Lap times for one stint: lap `i` runs at age `start_age + i` under `contexts[i]`.
    fn predict_stint(
        &self,
        compound: Compound,
        start_age: u32,
        contexts: &[LapContext],
    ) -> Result<Vec<f64>, PredictorError> {
        contexts
            .iter()
            .zip(start_age..)
            .map(|(context, age)| {
                let seconds = self.predict_lap_time(compound, age, context)?;
                if seconds.is_finite() && seconds > 0.0 {
                    Ok(seconds)
                } else {
                    Err(PredictorError::InvalidLapTime(seconds))
                }
            })
            .collect()
    }
}

pub trait WeatherSupplier: Send + Sync {
    fn features_for_lap(&self, lap: u32) -> WeatherFeatures;
}

/// The same snapshot for every lap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticWeather(pub WeatherFeatures);

impl WeatherSupplier for StaticWeather {
    fn features_for_lap(&self, _lap: u32) -> WeatherFeatures {
        self.0
    }
}
