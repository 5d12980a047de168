//! Deterministic parametric pace model.
//!
//! Stands in for the trained regression when none is wired in (CLI, benches).
//! Lap time = base + compound offset + wear slope * age + fuel effect * fuel
//! + track temperature and rain terms.

use serde::{Deserialize, Serialize};

use crate::error::PredictorError;
use crate::predictor::{LapContext, LapTimePredictor};
use crate::tyre::Compound;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePaceModel {
    pub base_lap_time_s: f64,
    /// Seconds per kg of fuel on board.
    pub fuel_effect_s_per_kg: f64,
    /// Seconds per degree above 25 C.
    pub temp_effect_s_per_c: f64,
    /// Slick penalty per mm of rain; wet-weather compounds gain it back.
    pub rain_effect_s_per_mm: f64,
}

impl Default for ReferencePaceModel {
    fn default() -> Self {
        Self {
            base_lap_time_s: 85.0,
            fuel_effect_s_per_kg: 0.035,
            temp_effect_s_per_c: 0.02,
            rain_effect_s_per_mm: 2.0,
        }
    }
}

impl ReferencePaceModel {
    pub fn with_base(base_lap_time_s: f64) -> Self {
        Self {
            base_lap_time_s,
            ..Self::default()
        }
    }

    const fn compound_offset(compound: Compound) -> f64 {
        match compound {
            Compound::Soft => 0.0,
            Compound::Medium => 0.45,
            Compound::Hard => 0.9,
            Compound::Intermediate => 4.0,
            Compound::Wet => 7.0,
        }
    }

    const fn wear_slope(compound: Compound) -> f64 {
        match compound {
            Compound::Soft => 0.09,
            Compound::Medium => 0.05,
            Compound::Hard => 0.03,
            Compound::Intermediate => 0.06,
            Compound::Wet => 0.05,
        }
    }

    fn rain_term(&self, compound: Compound, precip_mm: f64) -> f64 {
        let rain = precip_mm.max(0.0) * self.rain_effect_s_per_mm;
        match compound {
            Compound::Soft | Compound::Medium | Compound::Hard => rain,
            Compound::Intermediate => -rain.min(3.0),
            Compound::Wet => -rain.min(6.0),
        }
    }
}

impl LapTimePredictor for ReferencePaceModel {
    fn predict_lap_time(
        &self,
        compound: Compound,
        tire_age_laps: u32,
        context: &LapContext,
    ) -> Result<f64, PredictorError> {
        let weather = &context.weather;
        let seconds = self.base_lap_time_s
            + Self::compound_offset(compound)
            + Self::wear_slope(compound) * f64::from(tire_age_laps)
            + self.fuel_effect_s_per_kg * context.fuel_load_kg.max(0.0)
            + self.temp_effect_s_per_c * (weather.temp_c - 25.0)
            + self.rain_term(compound, weather.precip_mm);
        Ok(seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::WeatherFeatures;

    fn context(fuel: f64, precip_mm: f64) -> LapContext {
        LapContext {
            fuel_load_kg: fuel,
            weather: WeatherFeatures {
                precip_mm,
                ..WeatherFeatures::default()
            },
        }
    }

    #[test]
    fn softs_are_fastest_when_new_and_fade_quickest() {
        let model = ReferencePaceModel::default();
        let dry = context(50.0, 0.0);
        let soft_new = model.predict_lap_time(Compound::Soft, 0, &dry).unwrap();
        let hard_new = model.predict_lap_time(Compound::Hard, 0, &dry).unwrap();
        assert!(soft_new < hard_new);

        let soft_old = model.predict_lap_time(Compound::Soft, 30, &dry).unwrap();
        let hard_old = model.predict_lap_time(Compound::Hard, 30, &dry).unwrap();
        assert!(soft_old > hard_old);
    }

    #[test]
    fn lighter_car_is_quicker() {
        let model = ReferencePaceModel::default();
        let heavy = model.predict_lap_time(Compound::Medium, 5, &context(100.0, 0.0)).unwrap();
        let light = model.predict_lap_time(Compound::Medium, 5, &context(10.0, 0.0)).unwrap();
        assert!(light < heavy);
    }

    #[test]
    fn rain_favours_wet_weather_compounds() {
        let model = ReferencePaceModel::default();
        let wet = context(50.0, 4.0);
        let slick = model.predict_lap_time(Compound::Medium, 0, &wet).unwrap();
        let inter = model.predict_lap_time(Compound::Intermediate, 0, &wet).unwrap();
        assert!(inter < slick);
    }
}
