use rayon::prelude::*;

use crate::error::PlanError;
use crate::parallel::WorkerPool;
use crate::predictor::{LapContext, LapTimePredictor, WeatherSupplier};
use crate::strategy::candidates::StintCandidate;
use crate::strategy::partition::partition_laps;
use crate::strategy::StrategyOptions;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: StintCandidate,
    pub stint_laps: Vec<u32>,
    pub predicted_total_time: f64,
}

impl ScoredCandidate {
    pub fn stops(&self) -> usize {
        self.candidate.stops()
    }
}

/// Partition and score every candidate. Candidates whose sets cannot cover the
/// distance are dropped; a predictor failure aborts the whole search.
///
/// Each candidate only reads its own sets and the shared, immutable
/// collaborators, so the parallel path returns exactly what the sequential one does.
pub fn score_candidates(
    candidates: &[StintCandidate],
    total_laps: u32,
    predictor: &dyn LapTimePredictor,
    weather: &dyn WeatherSupplier,
    options: &StrategyOptions,
) -> Result<Vec<ScoredCandidate>, PlanError> {
    let run_one = |candidate: &StintCandidate| -> Result<Option<ScoredCandidate>, PlanError> {
        let weights: Vec<f64> = candidate
            .sets
            .iter()
            .map(|set| options.partition.weight(set))
            .collect();
        let caps: Vec<u32> = candidate
            .sets
            .iter()
            .map(|set| set.remaining_life_laps())
            .collect();
        let Some(stint_laps) = partition_laps(total_laps, &weights, &caps) else {
            tracing::debug!(candidate = candidate.index, "dropped: sets cannot cover race distance");
            return Ok(None);
        };

        let mut race_lap = 0u32;
        let mut total = 0.0;
        for (set, &laps) in candidate.sets.iter().zip(&stint_laps) {
            let contexts: Vec<LapContext> = (race_lap..race_lap + laps)
                .map(|lap| LapContext {
                    fuel_load_kg: options.fuel.load_at(lap),
                    weather: weather.features_for_lap(lap),
                })
                .collect();
            let lap_times = predictor.predict_stint(set.compound(), set.laps_used(), &contexts)?;
            total += lap_times.iter().sum::<f64>();
            race_lap += laps;
        }
        total += options.pit_penalty_s * candidate.stops() as f64;

        Ok(Some(ScoredCandidate {
            candidate: candidate.clone(),
            stint_laps,
            predicted_total_time: total,
        }))
    };

    let scored: Vec<Option<ScoredCandidate>> = if options.parallel {
        WorkerPool::with_workers(options.workers)
            .install(|| candidates.par_iter().map(run_one).collect::<Result<Vec<_>, _>>())?
    } else {
        candidates.iter().map(run_one).collect::<Result<Vec<_>, _>>()?
    };

    Ok(scored.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictorError;
    use crate::predictor::{ReferencePaceModel, StaticWeather};
    use crate::tyre::{Compound, TireSet};

    struct PerLap(f64);

    impl LapTimePredictor for PerLap {
        fn predict_lap_time(&self, _: Compound, _: u32, _: &LapContext) -> Result<f64, PredictorError> {
            Ok(self.0)
        }
    }

    struct Broken;

    impl LapTimePredictor for Broken {
        fn predict_lap_time(&self, _: Compound, _: u32, _: &LapContext) -> Result<f64, PredictorError> {
            Err(PredictorError::Failed("offline".to_string()))
        }
    }

    fn candidate(index: usize, sets: Vec<TireSet>) -> StintCandidate {
        StintCandidate { index, sets }
    }

    fn medium_hard() -> StintCandidate {
        candidate(
            0,
            vec![
                TireSet::new(9, Compound::Medium, 1.5),
                TireSet::new(12, Compound::Hard, 1.0),
            ],
        )
    }

    #[test]
    fn total_is_lap_sum_plus_pit_penalty() {
        let options = StrategyOptions::default();
        let scored = score_candidates(&[medium_hard()], 50, &PerLap(90.0), &StaticWeather::default(), &options)
            .unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].predicted_total_time, 50.0 * 90.0 + 25.0);
        assert_eq!(scored[0].stint_laps.iter().sum::<u32>(), 50);
    }

    #[test]
    fn candidate_short_of_distance_is_dropped() {
        let options = StrategyOptions::default();
        let softs = candidate(
            1,
            vec![
                TireSet::new(1, Compound::Soft, 2.5),
                TireSet::new(9, Compound::Medium, 1.5),
            ],
        );
        let scored =
            score_candidates(&[softs], 120, &PerLap(90.0), &StaticWeather::default(), &options).unwrap();
        assert!(scored.is_empty());
    }

    #[test]
    fn predictor_failure_surfaces() {
        let options = StrategyOptions::default();
        let err = score_candidates(&[medium_hard()], 50, &Broken, &StaticWeather::default(), &options)
            .unwrap_err();
        assert!(matches!(err, PlanError::PredictorUnavailable(PredictorError::Failed(_))));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let candidates: Vec<StintCandidate> = (0..8)
            .map(|index| {
                let mut sets = medium_hard().sets;
                if index % 2 == 1 {
                    sets.reverse();
                }
                candidate(index, sets)
            })
            .collect();
        let model = ReferencePaceModel::default();
        let weather = StaticWeather::default();
        let parallel = StrategyOptions::default();
        let sequential = StrategyOptions {
            parallel: false,
            ..StrategyOptions::default()
        };
        assert_eq!(
            score_candidates(&candidates, 53, &model, &weather, &parallel).unwrap(),
            score_candidates(&candidates, 53, &model, &weather, &sequential).unwrap()
        );
    }
}
