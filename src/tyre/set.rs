use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::session::SessionType;
use crate::tyre::Compound;

pub const FULL_CONDITION: f64 = 100.0;

/// One physical set of tires issued for the weekend.
///
/// `condition` only ever goes down; a set at 0 is retired and cannot be run again.
/// The fields are read-only outside this module: [TireSet::use_laps] is the only
/// way to change a set, and restored sets go through [TireSet::restore].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TireSetRecord")]
pub struct TireSet {
    set_number: u32,
    compound: Compound,
    laps_used: u32,
    sessions_used: BTreeSet<SessionType>,
    condition: f64,
    degradation_rate: f64,
}

/// Serialized shape of a [TireSet], checked on the way in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TireSetRecord {
    pub set_number: u32,
    pub compound: Compound,
    #[serde(default)]
    pub laps_used: u32,
    #[serde(default)]
    pub sessions_used: BTreeSet<SessionType>,
    pub condition: f64,
    pub degradation_rate: f64,
}

impl TryFrom<TireSetRecord> for TireSet {
    type Error = PlanError;

    fn try_from(record: TireSetRecord) -> Result<Self, Self::Error> {
        Self::restore(record)
    }
}

impl TireSet {
    pub fn new(set_number: u32, compound: Compound, degradation_rate: f64) -> Self {
        Self {
            set_number,
            compound,
            laps_used: 0,
            sessions_used: BTreeSet::new(),
            condition: FULL_CONDITION,
            degradation_rate,
        }
    }

    /// Rebuild a set from saved state, e.g. a residual inventory snapshot.
    pub fn restore(record: TireSetRecord) -> Result<Self, PlanError> {
        let invalid = |reason: String| PlanError::InvalidUsage {
            set_number: record.set_number,
            reason,
        };
        if !(record.condition.is_finite() && (0.0..=FULL_CONDITION).contains(&record.condition)) {
            return Err(invalid(format!(
                "condition {} is outside 0..={FULL_CONDITION}",
                record.condition
            )));
        }
        if !(record.degradation_rate.is_finite() && record.degradation_rate > 0.0) {
            return Err(invalid(format!(
                "degradation rate {} must be positive",
                record.degradation_rate
            )));
        }
        Ok(Self {
            set_number: record.set_number,
            compound: record.compound,
            laps_used: record.laps_used,
            sessions_used: record.sessions_used,
            condition: record.condition,
            degradation_rate: record.degradation_rate,
        })
    }

    pub fn set_number(&self) -> u32 {
        self.set_number
    }

    pub fn compound(&self) -> Compound {
        self.compound
    }

    pub fn laps_used(&self) -> u32 {
        self.laps_used
    }

    pub fn sessions_used(&self) -> &BTreeSet<SessionType> {
        &self.sessions_used
    }

    pub fn condition(&self) -> f64 {
        self.condition
    }

    pub fn degradation_rate(&self) -> f64 {
        self.degradation_rate
    }

    pub fn is_retired(&self) -> bool {
        self.condition <= 0.0
    }

    /// Whole laps left before the set reaches 0.
    pub fn remaining_life_laps(&self) -> u32 {
        if self.is_retired() || self.degradation_rate <= 0.0 {
            return 0;
        }
        (self.condition / self.degradation_rate).floor() as u32
    }

    /// Run the set for `laps` laps in `session`.
    ///
    /// Either every field is updated or none is: the request is validated before
    /// anything changes.
    pub fn use_laps(&mut self, laps: u32, session: SessionType) -> Result<(), PlanError> {
        if laps == 0 {
            return Err(PlanError::InvalidUsage {
                set_number: self.set_number,
                reason: "laps must be positive".to_string(),
            });
        }
        if self.is_retired() {
            return Err(PlanError::InvalidUsage {
                set_number: self.set_number,
                reason: "set is retired".to_string(),
            });
        }

        let wear = self.degradation_rate * f64::from(laps);
        self.laps_used = self.laps_used.saturating_add(laps);
        self.sessions_used.insert(session);
        self.condition = (self.condition - wear).clamp(0.0, FULL_CONDITION);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soft(set_number: u32) -> TireSet {
        TireSet::new(set_number, Compound::Soft, 2.5)
    }

    #[test]
    fn ten_laps_on_fresh_soft_leaves_75() {
        let mut set = soft(1);
        set.use_laps(10, SessionType::Fp1).expect("fresh set is usable");
        assert_eq!(set.condition(), 75.0);
        assert_eq!(set.laps_used(), 10);
        assert!(set.sessions_used().contains(&SessionType::Fp1));
    }

    #[test]
    fn condition_clamps_at_zero_and_retires() {
        let mut set = soft(1);
        set.use_laps(50, SessionType::Fp2).expect("fresh set is usable");
        assert_eq!(set.condition(), 0.0);
        assert!(set.is_retired());
        assert_eq!(set.remaining_life_laps(), 0);
    }

    #[test]
    fn retired_set_rejects_use_without_mutation() {
        let mut set = soft(3);
        set.use_laps(40, SessionType::Fp1).expect("fresh set is usable");
        let before = set.clone();

        let err = set.use_laps(1, SessionType::Fp2).unwrap_err();
        assert!(matches!(err, PlanError::InvalidUsage { set_number: 3, .. }));
        assert_eq!(set, before);
    }

    #[test]
    fn zero_laps_is_invalid() {
        let mut set = soft(2);
        assert!(matches!(
            set.use_laps(0, SessionType::Fp1),
            Err(PlanError::InvalidUsage { .. })
        ));
        assert_eq!(set.condition(), FULL_CONDITION);
        assert!(set.sessions_used().is_empty());
    }

    #[test]
    fn condition_never_increases_over_a_sequence_of_uses() {
        let mut set = TireSet::new(9, Compound::Medium, 1.5);
        let mut previous = set.condition();
        for (laps, session) in [
            (7, SessionType::Fp1),
            (3, SessionType::Fp2),
            (11, SessionType::Fp2),
            (29, SessionType::Fp3),
            (40, SessionType::Qualifying),
        ] {
            if set.is_retired() {
                break;
            }
            set.use_laps(laps, session).expect("set not retired yet");
            assert!(set.condition() <= previous);
            assert!((0.0..=FULL_CONDITION).contains(&set.condition()));
            previous = set.condition();
        }
        assert_eq!(set.sessions_used().len(), 4);
    }

    #[test]
    fn restore_rejects_out_of_range_state() {
        let record = |condition: f64, degradation_rate: f64| TireSetRecord {
            set_number: 4,
            compound: Compound::Soft,
            laps_used: 0,
            sessions_used: BTreeSet::new(),
            condition,
            degradation_rate,
        };
        assert!(TireSet::restore(record(250.0, 2.5)).is_err());
        assert!(TireSet::restore(record(-1.0, 2.5)).is_err());
        assert!(TireSet::restore(record(f64::NAN, 2.5)).is_err());
        assert!(matches!(
            TireSet::restore(record(50.0, 0.0)),
            Err(PlanError::InvalidUsage { set_number: 4, .. })
        ));
        let worn = TireSet::restore(record(60.0, 2.5)).unwrap();
        assert_eq!(worn.condition(), 60.0);
        assert_eq!(worn.remaining_life_laps(), 24);
    }

    #[test]
    fn deserializing_checks_condition() {
        let json = r#"{"set_number": 1, "compound": "SOFT", "condition": 250.0, "degradation_rate": 2.5}"#;
        let err = serde_json::from_str::<TireSet>(json).unwrap_err();
        assert!(err.to_string().contains("condition 250"));

        let json = r#"{"set_number": 1, "compound": "SOFT", "laps_used": 4, "condition": 90.0, "degradation_rate": 2.5}"#;
        let set: TireSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.laps_used(), 4);
    }

    #[test]
    fn remaining_life_uses_compound_rate() {
        assert_eq!(soft(1).remaining_life_laps(), 40);
        assert_eq!(TireSet::new(12, Compound::Hard, 1.0).remaining_life_laps(), 100);
    }
}
