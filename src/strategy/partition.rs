//! Splitting race distance across stints.

use serde::{Deserialize, Serialize};

use crate::tyre::TireSet;

/// How stint weights are derived from the assigned sets. The split itself is
/// always proportional to the weights and capped by each set's useful life.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionHeuristic {
    /// Weight = laps left before the set reaches 0 (condition / rate).
    #[default]
    UsefulLife,
    /// Weight = 1 / degradation rate, ignoring prior wear.
    InverseDegradation,
    /// Every stint weighted equally.
    Even,
}

impl PartitionHeuristic {
    pub fn weight(self, set: &TireSet) -> f64 {
        match self {
            Self::UsefulLife => set.condition() / set.degradation_rate(),
            Self::InverseDegradation => 1.0 / set.degradation_rate(),
            Self::Even => 1.0,
        }
    }
}

/// Split `total_laps` proportionally to `weights` with `caps[i]` as the most
/// laps stint `i` may run. Every stint gets at least one lap.
///
/// Returns `None` when the caps cannot cover the distance or there are more
/// stints than laps.
pub fn partition_laps(total_laps: u32, weights: &[f64], caps: &[u32]) -> Option<Vec<u32>> {
    let stints = weights.len();
    if stints == 0 || stints != caps.len() || (total_laps as usize) < stints {
        return None;
    }
    if caps.iter().any(|&cap| cap == 0) {
        return None;
    }
    let capacity: u64 = caps.iter().map(|&cap| u64::from(cap)).sum();
    if capacity < u64::from(total_laps) {
        return None;
    }

    let weights: Vec<f64> = weights
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { *w } else { f64::EPSILON })
        .collect();

    // Water-fill: stints whose share exceeds their cap are pinned at the cap and
    // the rest of the distance is re-shared among the others.
    let mut shares = vec![0.0_f64; stints];
    let mut pinned = vec![false; stints];
    let mut remaining = f64::from(total_laps);
    loop {
        let open_weight: f64 = (0..stints).filter(|&i| !pinned[i]).map(|i| weights[i]).sum();
        if open_weight <= 0.0 {
            break;
        }
        let mut pinned_any = false;
        for i in 0..stints {
            if pinned[i] {
                continue;
            }
            let share = remaining * weights[i] / open_weight;
            if share > f64::from(caps[i]) {
                pinned[i] = true;
                shares[i] = f64::from(caps[i]);
                remaining -= f64::from(caps[i]);
                pinned_any = true;
            }
        }
        if !pinned_any {
            for i in (0..stints).filter(|&i| !pinned[i]) {
                shares[i] = remaining * weights[i] / open_weight;
            }
            break;
        }
    }

    // Largest remainder rounding.
    let mut laps: Vec<u32> = shares
        .iter()
        .zip(caps)
        .map(|(share, &cap)| (share.floor().max(0.0) as u32).min(cap))
        .collect();
    let mut order: Vec<usize> = (0..stints).collect();
    order.sort_by(|&a, &b| {
        let frac_a = shares[a] - shares[a].floor();
        let frac_b = shares[b] - shares[b].floor();
        frac_b.total_cmp(&frac_a).then_with(|| a.cmp(&b))
    });
    let mut assigned: u32 = laps.iter().sum();
    while assigned < total_laps {
        let Some(&next) = order.iter().find(|&&i| laps[i] < caps[i]) else {
            return None;
        };
        laps[next] += 1;
        assigned += 1;
        order.retain(|&i| i != next);
        if order.is_empty() {
            order = (0..stints).collect();
        }
    }

    for i in 0..stints {
        if laps[i] == 0 {
            let donor = (0..stints)
                .filter(|&j| laps[j] > 1)
                .max_by(|&a, &b| laps[a].cmp(&laps[b]).then_with(|| b.cmp(&a)))?;
            laps[donor] -= 1;
            laps[i] = 1;
        }
    }

    let valid = laps.iter().sum::<u32>() == total_laps
        && laps.iter().zip(caps).all(|(&stint, &cap)| stint >= 1 && stint <= cap);
    valid.then_some(laps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tyre::Compound;

    #[test]
    fn proportional_split_sums_to_distance() {
        let laps = partition_laps(53, &[40.0, 100.0], &[40, 100]).unwrap();
        assert_eq!(laps.iter().sum::<u32>(), 53);
        assert_eq!(laps, vec![15, 38]);
    }

    #[test]
    fn caps_push_laps_onto_longer_lived_sets() {
        let laps = partition_laps(60, &[1.0, 1.0], &[20, 100]).unwrap();
        assert_eq!(laps, vec![20, 40]);
    }

    #[test]
    fn insufficient_life_is_infeasible() {
        assert_eq!(partition_laps(90, &[1.0, 1.0], &[40, 40]), None);
        assert_eq!(partition_laps(2, &[1.0, 1.0, 1.0], &[5, 5, 5]), None);
        assert_eq!(partition_laps(10, &[1.0, 1.0], &[0, 50]), None);
    }

    #[test]
    fn every_stint_runs_at_least_one_lap() {
        let laps = partition_laps(10, &[1000.0, 0.001, 0.001], &[10, 10, 10]).unwrap();
        assert!(laps.iter().all(|&l| l >= 1));
        assert_eq!(laps.iter().sum::<u32>(), 10);
    }

    #[test]
    fn heuristic_weights() {
        let soft = TireSet::new(1, Compound::Soft, 2.5);
        let hard = TireSet::new(12, Compound::Hard, 1.0);
        assert_eq!(PartitionHeuristic::UsefulLife.weight(&soft), 40.0);
        assert_eq!(PartitionHeuristic::InverseDegradation.weight(&hard), 1.0);
        assert_eq!(PartitionHeuristic::Even.weight(&soft), PartitionHeuristic::Even.weight(&hard));
    }
}
