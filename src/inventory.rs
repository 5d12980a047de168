//! The weekend's tire sets, numbered once and mutated in place.

use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::error::PlanError;
use crate::session::SessionType;
use crate::tyre::{Compound, DegradationTable, TireSet};

/// Sets are only changed through [Inventory::use_set]; callers never get a
/// mutable set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "InventoryRecord")]
pub struct Inventory {
    sets: Vec<TireSet>,
}

#[derive(Deserialize)]
struct InventoryRecord {
    sets: Vec<TireSet>,
}

impl TryFrom<InventoryRecord> for Inventory {
    type Error = PlanError;

    fn try_from(record: InventoryRecord) -> Result<Self, Self::Error> {
        Self::from_sets(record.sets)
    }
}

impl Inventory {
    /// Issue every set in `allocation`, numbering from 1 across compound groups
    /// in [Compound::ALL] order.
    pub fn build(allocation: &Allocation, degradation: &DegradationTable) -> Self {
        let mut sets = Vec::with_capacity(allocation.total() as usize);
        let mut set_number = 1;
        for compound in Compound::ALL {
            for _ in 0..allocation.count(compound) {
                sets.push(TireSet::new(set_number, compound, degradation.rate(compound)));
                set_number += 1;
            }
        }
        Self { sets }
    }

    /// Wrap pre-existing sets, e.g. a residual snapshot restored by a caller.
    /// Sets are kept in ascending `set_number` order; numbers must be unique.
    pub fn from_sets(mut sets: Vec<TireSet>) -> Result<Self, PlanError> {
        sets.sort_by_key(TireSet::set_number);
        if let Some(pair) = sets
            .windows(2)
            .find(|pair| pair[0].set_number() == pair[1].set_number())
        {
            return Err(PlanError::InvalidUsage {
                set_number: pair[0].set_number(),
                reason: "set number appears more than once".to_string(),
            });
        }
        Ok(Self { sets })
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TireSet> {
        self.sets.iter()
    }

    pub fn get(&self, set_number: u32) -> Option<&TireSet> {
        self.position(set_number).map(|index| &self.sets[index])
    }

    /// Run set `set_number` for `laps` laps in `session`.
    pub fn use_set(&mut self, set_number: u32, laps: u32, session: SessionType) -> Result<(), PlanError> {
        let index = self.position(set_number).ok_or_else(|| PlanError::InvalidUsage {
            set_number,
            reason: "set is not part of the inventory".to_string(),
        })?;
        self.sets[index].use_laps(laps, session)
    }

    fn position(&self, set_number: u32) -> Option<usize> {
        self.sets
            .binary_search_by_key(&set_number, TireSet::set_number)
            .ok()
    }

    /// Non-retired sets matching the filters, in inventory order.
    pub fn available(&self, compound: Option<Compound>, min_condition: Option<f64>) -> Vec<&TireSet> {
        self.sets
            .iter()
            .filter(|set| !set.is_retired())
            .filter(|set| compound.map_or(true, |wanted| set.compound() == wanted))
            .filter(|set| min_condition.map_or(true, |min| set.condition() >= min))
            .collect()
    }

    pub fn count_available(&self, compound: Compound) -> usize {
        self.available(Some(compound), None).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionType;

    fn default_inventory() -> Inventory {
        Inventory::build(&Allocation::default(), &DegradationTable::default())
    }

    #[test]
    fn default_allocation_numbers_sets_by_compound_group() {
        let inventory = default_inventory();
        assert_eq!(inventory.len(), 20);

        let expected = [
            (Compound::Soft, 1..=8),
            (Compound::Medium, 9..=11),
            (Compound::Hard, 12..=13),
            (Compound::Intermediate, 14..=17),
            (Compound::Wet, 18..=20),
        ];
        for (compound, range) in expected {
            for set_number in range {
                let set = inventory.get(set_number).expect("set should exist");
                assert_eq!(set.compound(), compound, "set {set_number}");
                assert_eq!(set.condition(), 100.0);
                assert_eq!(set.laps_used(), 0);
            }
        }
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(default_inventory(), default_inventory());
    }

    #[test]
    fn available_filters_and_preserves_order() {
        let mut inventory = default_inventory();
        inventory.use_set(2, 40, SessionType::Fp1).unwrap();
        inventory.use_set(3, 20, SessionType::Fp1).unwrap();

        let softs: Vec<u32> = inventory
            .available(Some(Compound::Soft), None)
            .iter()
            .map(|set| set.set_number())
            .collect();
        assert_eq!(softs, vec![1, 3, 4, 5, 6, 7, 8]);

        let fresh_softs = inventory.available(Some(Compound::Soft), Some(60.0));
        assert_eq!(fresh_softs.len(), 6);
        assert_eq!(inventory.available(None, None).len(), 19);
    }

    #[test]
    fn use_set_rejects_unknown_numbers() {
        let mut inventory = default_inventory();
        assert!(matches!(
            inventory.use_set(99, 5, SessionType::Fp1),
            Err(PlanError::InvalidUsage { set_number: 99, .. })
        ));
    }

    #[test]
    fn from_sets_rejects_duplicate_numbers() {
        let sets = vec![
            TireSet::new(3, Compound::Soft, 2.5),
            TireSet::new(3, Compound::Hard, 1.0),
        ];
        assert!(matches!(
            Inventory::from_sets(sets),
            Err(PlanError::InvalidUsage { set_number: 3, .. })
        ));
    }

    #[test]
    fn deserialized_inventory_is_validated() {
        let over_full = r#"{"sets": [{"set_number": 1, "compound": "SOFT", "condition": 250.0, "degradation_rate": 2.5}]}"#;
        assert!(serde_json::from_str::<Inventory>(over_full).is_err());

        let duplicated = r#"{"sets": [
            {"set_number": 1, "compound": "SOFT", "condition": 90.0, "degradation_rate": 2.5},
            {"set_number": 1, "compound": "HARD", "condition": 90.0, "degradation_rate": 1.0}
        ]}"#;
        assert!(serde_json::from_str::<Inventory>(duplicated).is_err());

        let inventory = default_inventory();
        let json = serde_json::to_string(&inventory).unwrap();
        assert_eq!(serde_json::from_str::<Inventory>(&json).unwrap(), inventory);
    }
}
