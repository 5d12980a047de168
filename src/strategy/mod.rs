//! Race strategy search over the post-qualifying inventory.
//!
//! Pipeline: [CandidateGenerator] → [score_candidates] → [rank_candidates] →
//! top-N [RaceStrategy] records.

pub mod candidates;
pub mod partition;
pub mod ranking;
pub mod scoring;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::inventory::Inventory;
use crate::predictor::{FuelModel, LapTimePredictor, WeatherSupplier};
use crate::tyre::Compound;

pub use candidates::{CandidateGenerator, StintCandidate, Tier};
pub use partition::{partition_laps, PartitionHeuristic};
pub use ranking::rank_candidates;
pub use scoring::{score_candidates, ScoredCandidate};

pub const DEFAULT_PIT_PENALTY_S: f64 = 25.0;
/// Upper bound on `max_stops`; the candidate count grows as compounds^(stops + 1).
pub const MAX_STOPS: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyOptions {
    /// Seconds lost per pit stop.
    pub pit_penalty_s: f64,
    /// Dry races enforce the two-compound rule and run slicks only.
    pub dry: bool,
    pub min_stops: u32,
    pub max_stops: u32,
    pub top_n: usize,
    /// Sets above this condition are fresh.
    pub fresh_threshold: f64,
    /// Sets at or below this condition are unusable except as a last resort.
    pub worn_threshold: f64,
    pub partition: PartitionHeuristic,
    pub fuel: FuelModel,
    pub parallel: bool,
    /// Scoring threads; 0 uses every core.
    pub workers: usize,
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self {
            pit_penalty_s: DEFAULT_PIT_PENALTY_S,
            dry: true,
            min_stops: 1,
            max_stops: 2,
            top_n: 3,
            fresh_threshold: 70.0,
            worn_threshold: 30.0,
            partition: PartitionHeuristic::UsefulLife,
            fuel: FuelModel::default(),
            parallel: true,
            workers: 0,
        }
    }
}

impl StrategyOptions {
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.pit_penalty_s.is_finite() || self.pit_penalty_s < 0.0 {
            return Err(PlanError::InvalidRequest(format!(
                "pit penalty must be a non-negative number of seconds, got {}",
                self.pit_penalty_s
            )));
        }
        if self.top_n == 0 {
            return Err(PlanError::InvalidRequest("top_n must be at least 1".to_string()));
        }
        if self.max_stops > MAX_STOPS {
            return Err(PlanError::InvalidRequest(format!(
                "max_stops {} exceeds the limit of {MAX_STOPS}",
                self.max_stops
            )));
        }
        if self.min_stops > self.max_stops {
            return Err(PlanError::InvalidRequest(format!(
                "min_stops {} exceeds max_stops {}",
                self.min_stops, self.max_stops
            )));
        }
        if !(0.0..=100.0).contains(&self.worn_threshold)
            || !(0.0..=100.0).contains(&self.fresh_threshold)
            || self.worn_threshold >= self.fresh_threshold
        {
            return Err(PlanError::InvalidRequest(format!(
                "condition thresholds must satisfy 0 <= worn ({}) < fresh ({}) <= 100",
                self.worn_threshold, self.fresh_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stint {
    pub compound: Compound,
    pub tire_set: u32,
    pub laps: u32,
    pub starting_condition: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceStrategy {
    pub id: String,
    pub name: String,
    pub stints: Vec<Stint>,
    pub pit_laps: Vec<u32>,
    pub predicted_total_time: f64,
}

impl RaceStrategy {
    pub fn from_scored(id: String, scored: &ScoredCandidate) -> Self {
        let stints: Vec<Stint> = scored
            .candidate
            .sets
            .iter()
            .zip(&scored.stint_laps)
            .map(|(set, &laps)| Stint {
                compound: set.compound(),
                tire_set: set.set_number(),
                laps,
                starting_condition: set.condition(),
            })
            .collect();
        let pit_laps = stints
            .iter()
            .take(stints.len().saturating_sub(1))
            .scan(0u32, |lap, stint| {
                *lap += stint.laps;
                Some(*lap)
            })
            .collect();
        Self {
            id,
            name: strategy_name(&stints),
            stints,
            pit_laps,
            predicted_total_time: scored.predicted_total_time,
        }
    }

    pub fn stops(&self) -> usize {
        self.pit_laps.len()
    }

    /// Coverage, pit-lap and (for dry races) compound-diversity invariants.
    pub fn check(&self, total_laps: u32, dry: bool) -> Result<(), String> {
        if self.stints.is_empty() {
            return Err("strategy has no stints".to_string());
        }
        let covered: u32 = self.stints.iter().map(|stint| stint.laps).sum();
        if covered != total_laps {
            return Err(format!("stints cover {covered} of {total_laps} laps"));
        }
        if self.stints.iter().any(|stint| stint.laps == 0) {
            return Err("empty stint".to_string());
        }
        if self.pit_laps.len() + 1 != self.stints.len() {
            return Err("pit laps do not match stint count".to_string());
        }
        if self.pit_laps.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err("pit laps are not strictly increasing".to_string());
        }
        if dry {
            let first = self.stints[0].compound;
            if self.stints.iter().all(|stint| stint.compound == first) {
                return Err("dry race needs at least two compounds".to_string());
            }
        }
        if !(self.predicted_total_time.is_finite() && self.predicted_total_time > 0.0) {
            return Err(format!("predicted time {} is not positive", self.predicted_total_time));
        }
        Ok(())
    }
}

fn strategy_name(stints: &[Stint]) -> String {
    let stops = match stints.len().saturating_sub(1) {
        0 => "No-Stop".to_string(),
        1 => "One-Stop".to_string(),
        2 => "Two-Stop".to_string(),
        3 => "Three-Stop".to_string(),
        n => format!("{n}-Stop"),
    };
    let sequence: Vec<&str> = stints.iter().map(|stint| stint.compound.label()).collect();
    format!("{stops}: {}", sequence.join(" → "))
}

/// `plan_a`, `plan_b`, … `plan_z`, then `plan_27` onwards.
pub fn plan_label(rank: usize) -> String {
    match u8::try_from(rank) {
        Ok(r) if r < 26 => format!("plan_{}", char::from(b'a' + r)),
        _ => format!("plan_{}", rank + 1),
    }
}

/// Search the residual inventory for the `top_n` fastest legal strategies.
///
/// Fresh sets are tried first. Worn sets join only when fresh ones yield
/// nothing feasible, and unusable sets only when that pass fails too.
pub fn plan_race_strategies(
    inventory: &Inventory,
    total_laps: u32,
    predictor: &dyn LapTimePredictor,
    weather: &dyn WeatherSupplier,
    options: &StrategyOptions,
) -> Result<Vec<RaceStrategy>, PlanError> {
    if total_laps == 0 {
        return Err(PlanError::InvalidRequest("total_laps must be positive".to_string()));
    }
    options.validate()?;
    if options.max_stops >= total_laps {
        return Err(PlanError::InvalidRequest(format!(
            "max_stops {} leaves an empty stint in a {total_laps}-lap race",
            options.max_stops
        )));
    }

    let generator = CandidateGenerator::new(options);
    let mut scored = Vec::new();
    for widest in Tier::PASSES {
        if widest != Tier::Fresh {
            tracing::warn!(tier = ?widest, "no feasible strategy from better sets; widening the pool");
        }
        let candidates = generator.generate(inventory, widest);
        tracing::debug!(
            candidates = candidates.len(),
            tier = ?widest,
            "scoring strategy candidates"
        );
        scored = score_candidates(&candidates, total_laps, predictor, weather, options)?;
        if !scored.is_empty() {
            break;
        }
    }

    let strategies: Vec<RaceStrategy> = rank_candidates(scored)
        .iter()
        .map(|candidate| RaceStrategy::from_scored(String::new(), candidate))
        .filter(|strategy| match strategy.check(total_laps, options.dry) {
            Ok(()) => true,
            Err(reason) => {
                tracing::warn!(strategy = %strategy.name, %reason, "discarding invalid strategy");
                false
            }
        })
        .take(options.top_n)
        .enumerate()
        .map(|(rank, strategy)| RaceStrategy {
            id: plan_label(rank),
            ..strategy
        })
        .collect();

    if strategies.is_empty() {
        let rule = if options.dry {
            "at least two compounds covering"
        } else {
            "tire sets covering"
        };
        return Err(PlanError::NoFeasibleStrategy(format!(
            "no combination of remaining sets offers {rule} {total_laps} laps"
        )));
    }
    Ok(strategies)
}
