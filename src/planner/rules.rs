//! Tire-set selection rules for practice and qualifying sessions.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::inventory::Inventory;
use crate::session::SessionType;
use crate::tyre::{Compound, TireSet};

/// Picks the sets a session will run on. Implementations must not mutate the
/// inventory; the planner applies wear after the plan is recorded.
pub trait SelectionRule: Send + Sync {
    fn select(
        &self,
        session: SessionType,
        inventory: &Inventory,
        target_laps: u32,
    ) -> Result<Vec<u32>, PlanError>;
}

/// Which set of a compound to take first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetPreference {
    /// Highest condition first, for peak pace.
    Freshest,
    /// Already-scrubbed sets first, provided they still last `target_laps`.
    MostUsed,
}

/// What a session wants from the inventory: one compound per requested set,
/// and the compounds to fall back on when a slot cannot be filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIntent {
    pub slots: Vec<Compound>,
    #[serde(default)]
    pub fallback: Vec<Compound>,
    pub preference: SetPreference,
}

impl SessionIntent {
    pub fn new(slots: Vec<Compound>, fallback: Vec<Compound>, preference: SetPreference) -> Self {
        Self {
            slots,
            fallback,
            preference,
        }
    }
}

/// Default [SelectionRule]: fills each slot from the inventory according to the
/// session's [SessionIntent].
#[derive(Debug, Clone, Default)]
pub struct IntentRule {
    intents: BTreeMap<SessionType, SessionIntent>,
}

impl IntentRule {
    pub fn new(intents: BTreeMap<SessionType, SessionIntent>) -> Self {
        Self { intents }
    }

    fn pick<'a>(
        inventory: &'a Inventory,
        compound: Compound,
        taken: &[u32],
        preference: SetPreference,
        target_laps: u32,
    ) -> Option<&'a TireSet> {
        let mut candidates: Vec<&TireSet> = inventory
            .available(Some(compound), None)
            .into_iter()
            .filter(|set| !taken.contains(&set.set_number()))
            .collect();
        candidates.sort_by(|left, right| compare_sets(left, right, preference, target_laps));
        candidates.into_iter().next()
    }
}

fn compare_sets(left: &TireSet, right: &TireSet, preference: SetPreference, target_laps: u32) -> Ordering {
    match preference {
        SetPreference::Freshest => right
            .condition()
            .total_cmp(&left.condition())
            .then_with(|| left.set_number().cmp(&right.set_number())),
        SetPreference::MostUsed => {
            let left_short = left.remaining_life_laps() < target_laps;
            let right_short = right.remaining_life_laps() < target_laps;
            left_short
                .cmp(&right_short)
                .then_with(|| {
                    if left_short {
                        right.condition().total_cmp(&left.condition())
                    } else {
                        left.condition().total_cmp(&right.condition())
                    }
                })
                .then_with(|| left.set_number().cmp(&right.set_number()))
        }
    }
}

impl SelectionRule for IntentRule {
    fn select(
        &self,
        session: SessionType,
        inventory: &Inventory,
        target_laps: u32,
    ) -> Result<Vec<u32>, PlanError> {
        let intent = self.intents.get(&session).ok_or_else(|| {
            PlanError::InvalidRequest(format!("no selection intent configured for {session}"))
        })?;

        let mut chosen: Vec<u32> = Vec::with_capacity(intent.slots.len());
        for &slot in &intent.slots {
            let picked = std::iter::once(slot)
                .chain(intent.fallback.iter().copied())
                .find_map(|compound| {
                    Self::pick(inventory, compound, &chosen, intent.preference, target_laps)
                });
            match picked {
                Some(set) => {
                    if set.compound() != slot {
                        tracing::debug!(
                            %session,
                            wanted = %slot,
                            used = %set.compound(),
                            set = set.set_number(),
                            "slot filled from fallback compound"
                        );
                    }
                    chosen.push(set.set_number());
                }
                None => {
                    return Err(PlanError::InsufficientInventory {
                        session,
                        compound: slot,
                    })
                }
            }
        }
        Ok(chosen)
    }
}
