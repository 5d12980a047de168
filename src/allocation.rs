//! Regulatory tire allocation per weekend.

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::session::WeekendFormat;
use crate::tyre::Compound;

pub const DEFAULT_SOFT: u32 = 8;
pub const DEFAULT_MEDIUM: u32 = 3;
pub const DEFAULT_HARD: u32 = 2;
pub const INTERMEDIATE_CAP: u32 = 4;
pub const WET_CAP: u32 = 3;

/// Sets issued per compound. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    soft: u32,
    medium: u32,
    hard: u32,
    intermediate: u32,
    wet: u32,
}

impl Default for Allocation {
    fn default() -> Self {
        Self {
            soft: DEFAULT_SOFT,
            medium: DEFAULT_MEDIUM,
            hard: DEFAULT_HARD,
            intermediate: INTERMEDIATE_CAP,
            wet: WET_CAP,
        }
    }
}

/// Caller-supplied counts. Signed so that bad input can be reported rather than
/// wrapped; intermediate and wet fall back to the fixed caps when omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOverride {
    pub soft: i64,
    pub medium: i64,
    pub hard: i64,
    #[serde(default)]
    pub intermediate: Option<i64>,
    #[serde(default)]
    pub wet: Option<i64>,
}

impl AllocationOverride {
    pub fn slicks(soft: i64, medium: i64, hard: i64) -> Self {
        Self {
            soft,
            medium,
            hard,
            intermediate: None,
            wet: None,
        }
    }

    fn resolve(&self) -> Result<Allocation, PlanError> {
        Ok(Allocation {
            soft: checked_count(Compound::Soft, self.soft)?,
            medium: checked_count(Compound::Medium, self.medium)?,
            hard: checked_count(Compound::Hard, self.hard)?,
            intermediate: checked_count(
                Compound::Intermediate,
                self.intermediate.unwrap_or(i64::from(INTERMEDIATE_CAP)),
            )?,
            wet: checked_count(Compound::Wet, self.wet.unwrap_or(i64::from(WET_CAP)))?,
        })
    }
}

fn checked_count(compound: Compound, raw: i64) -> Result<u32, PlanError> {
    if raw < 0 {
        return Err(PlanError::InvalidAllocation(format!(
            "{compound} count must be >= 0, got {raw}"
        )));
    }
    u32::try_from(raw).map_err(|_| {
        PlanError::InvalidAllocation(format!("{compound} count {raw} is out of range"))
    })
}

impl Allocation {
    /// Allocation for `format` under the default policy.
    pub fn for_format(
        format: WeekendFormat,
        explicit: Option<&AllocationOverride>,
    ) -> Result<Self, PlanError> {
        AllocationPolicy::default().for_format(format, explicit)
    }

    pub const fn count(&self, compound: Compound) -> u32 {
        match compound {
            Compound::Soft => self.soft,
            Compound::Medium => self.medium,
            Compound::Hard => self.hard,
            Compound::Intermediate => self.intermediate,
            Compound::Wet => self.wet,
        }
    }

    pub fn total(&self) -> u32 {
        Compound::ALL.iter().map(|compound| self.count(*compound)).sum()
    }
}

/// Per-format profiles. Both formats share the default profile unless
/// configuration supplies a sprint-specific one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationPolicy {
    pub standard: Option<AllocationOverride>,
    pub sprint: Option<AllocationOverride>,
}

impl AllocationPolicy {
    pub fn for_format(
        &self,
        format: WeekendFormat,
        explicit: Option<&AllocationOverride>,
    ) -> Result<Allocation, PlanError> {
        if let Some(counts) = explicit {
            return counts.resolve();
        }
        let profile = match format {
            WeekendFormat::Standard => self.standard.as_ref(),
            WeekendFormat::Sprint => self.sprint.as_ref(),
        };
        match profile {
            Some(counts) => counts.resolve(),
            None => Ok(Allocation::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_ignores_format() {
        let standard = Allocation::for_format(WeekendFormat::Standard, None).unwrap();
        let sprint = Allocation::for_format(WeekendFormat::Sprint, None).unwrap();
        assert_eq!(standard, sprint);
        assert_eq!(standard.total(), 20);
        assert_eq!(standard.count(Compound::Soft), 8);
        assert_eq!(standard.count(Compound::Wet), 3);
    }

    #[test]
    fn explicit_counts_are_used_verbatim() {
        let explicit = AllocationOverride {
            soft: 6,
            medium: 4,
            hard: 3,
            intermediate: Some(5),
            wet: Some(2),
        };
        let allocation = Allocation::for_format(WeekendFormat::Sprint, Some(&explicit)).unwrap();
        assert_eq!(allocation.count(Compound::Soft), 6);
        assert_eq!(allocation.count(Compound::Medium), 4);
        assert_eq!(allocation.count(Compound::Hard), 3);
        assert_eq!(allocation.count(Compound::Intermediate), 5);
        assert_eq!(allocation.count(Compound::Wet), 2);
    }

    #[test]
    fn omitted_wet_counts_use_fixed_caps() {
        let allocation =
            Allocation::for_format(WeekendFormat::Standard, Some(&AllocationOverride::slicks(0, 2, 2)))
                .unwrap();
        assert_eq!(allocation.count(Compound::Soft), 0);
        assert_eq!(allocation.count(Compound::Intermediate), INTERMEDIATE_CAP);
        assert_eq!(allocation.count(Compound::Wet), WET_CAP);
    }

    #[test]
    fn negative_count_is_rejected() {
        let err = Allocation::for_format(
            WeekendFormat::Standard,
            Some(&AllocationOverride::slicks(8, -1, 2)),
        )
        .unwrap_err();
        assert!(matches!(err, PlanError::InvalidAllocation(_)));
    }

    #[test]
    fn configured_sprint_profile_applies_only_to_sprint() {
        let policy = AllocationPolicy {
            standard: None,
            sprint: Some(AllocationOverride::slicks(6, 4, 2)),
        };
        let sprint = policy.for_format(WeekendFormat::Sprint, None).unwrap();
        let standard = policy.for_format(WeekendFormat::Standard, None).unwrap();
        assert_eq!(sprint.count(Compound::Soft), 6);
        assert_eq!(standard, Allocation::default());
    }
}
