use crate::strategy::scoring::ScoredCandidate;

/// Fastest first; ties go to fewer stops, then fresher starting sets, then
/// generation order.
pub fn rank_candidates(mut scored: Vec<ScoredCandidate>) -> Vec<ScoredCandidate> {
    scored.sort_by(|left, right| {
        left.predicted_total_time
            .total_cmp(&right.predicted_total_time)
            .then_with(|| left.stops().cmp(&right.stops()))
            .then_with(|| {
                right
                    .candidate
                    .starting_condition_sum()
                    .total_cmp(&left.candidate.starting_condition_sum())
            })
            .then_with(|| left.candidate.index.cmp(&right.candidate.index))
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionType;
    use crate::strategy::candidates::StintCandidate;
    use crate::tyre::{Compound, TireSet};

    fn scored(index: usize, compounds: &[Compound], time: f64) -> ScoredCandidate {
        let sets: Vec<TireSet> = compounds
            .iter()
            .enumerate()
            .map(|(i, compound)| TireSet::new(i as u32 + 1, *compound, 1.0))
            .collect();
        let stint_laps = vec![1; sets.len()];
        ScoredCandidate {
            candidate: StintCandidate { index, sets },
            stint_laps,
            predicted_total_time: time,
        }
    }

    #[test]
    fn lower_time_ranks_first() {
        let ranked = rank_candidates(vec![
            scored(0, &[Compound::Medium, Compound::Hard], 5420.0),
            scored(1, &[Compound::Soft, Compound::Hard], 5400.0),
        ]);
        assert_eq!(ranked[0].predicted_total_time, 5400.0);
        assert_eq!(ranked[1].predicted_total_time, 5420.0);
    }

    #[test]
    fn tie_prefers_fewer_stops() {
        let ranked = rank_candidates(vec![
            scored(0, &[Compound::Soft, Compound::Medium, Compound::Hard], 5400.0),
            scored(1, &[Compound::Medium, Compound::Hard], 5400.0),
        ]);
        assert_eq!(ranked[0].stops(), 1);
        assert_eq!(ranked[1].stops(), 2);
    }

    #[test]
    fn tie_on_stops_prefers_fresher_sets() {
        let mut worn = scored(0, &[Compound::Medium, Compound::Hard], 5400.0);
        worn.candidate.sets[0].use_laps(10, SessionType::Fp2).unwrap();
        let fresh = scored(1, &[Compound::Hard, Compound::Medium], 5400.0);
        let ranked = rank_candidates(vec![worn, fresh]);
        assert_eq!(ranked[0].candidate.index, 1);
    }
}
