//! Candidate generation: compound sequences per stop count, each paired with
//! concrete tire sets from the residual inventory.

use serde::Serialize;

use crate::inventory::Inventory;
use crate::strategy::StrategyOptions;
use crate::tyre::{Compound, TireSet};

/// Condition band a set falls into for race use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Fresh,
    Worn,
    Unusable,
}

impl Tier {
    /// Search passes in order; each later pass widens the pool.
    pub const PASSES: [Tier; 3] = [Tier::Fresh, Tier::Worn, Tier::Unusable];

    pub fn of(set: &TireSet, options: &StrategyOptions) -> Self {
        if set.condition() > options.fresh_threshold {
            Self::Fresh
        } else if set.condition() > options.worn_threshold {
            Self::Worn
        } else {
            Self::Unusable
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StintCandidate {
    /// Position in generation order; the last ranking tie-breaker.
    pub index: usize,
    pub sets: Vec<TireSet>,
}

impl StintCandidate {
    pub fn stops(&self) -> usize {
        self.sets.len().saturating_sub(1)
    }

    pub fn compounds(&self) -> impl Iterator<Item = Compound> + '_ {
        self.sets.iter().map(|set| set.compound())
    }

    pub fn distinct_compounds(&self) -> usize {
        let mut seen: Vec<Compound> = Vec::with_capacity(self.sets.len());
        for compound in self.compounds() {
            if !seen.contains(&compound) {
                seen.push(compound);
            }
        }
        seen.len()
    }

    pub fn starting_condition_sum(&self) -> f64 {
        self.sets.iter().map(|set| set.condition()).sum()
    }
}

#[derive(Debug, Clone)]
pub struct CandidateGenerator<'a> {
    options: &'a StrategyOptions,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(options: &'a StrategyOptions) -> Self {
        Self { options }
    }

    /// Ordered compound sequences for every stop count in range. Dry races keep
    /// only sequences with at least two distinct compounds.
    pub fn sequences(&self, compounds: &[Compound]) -> Vec<Vec<Compound>> {
        let mut sequences = Vec::new();
        if compounds.is_empty() {
            return sequences;
        }
        for stops in self.options.min_stops..=self.options.max_stops {
            let stints = stops as usize + 1;
            let mut digits = vec![0usize; stints];
            loop {
                let sequence: Vec<Compound> = digits.iter().map(|&d| compounds[d]).collect();
                if !self.options.dry || has_two_compounds(&sequence) {
                    sequences.push(sequence);
                }
                if !advance(&mut digits, compounds.len()) {
                    break;
                }
            }
        }
        sequences
    }

    /// Candidates drawn from sets in tier `widest` or better: `Fresh` uses fresh
    /// sets only, `Worn` adds worn ones, `Unusable` takes everything not retired.
    pub fn generate(&self, inventory: &Inventory, widest: Tier) -> Vec<StintCandidate> {
        let mut pool: Vec<(Tier, &TireSet)> = inventory
            .available(None, None)
            .into_iter()
            .filter(|set| !self.options.dry || set.compound().is_slick())
            .map(|set| (Tier::of(set, self.options), set))
            .filter(|(tier, _)| *tier <= widest)
            .collect();
        pool.sort_by(|(tier_a, a), (tier_b, b)| {
            tier_a
                .cmp(tier_b)
                .then_with(|| b.condition().total_cmp(&a.condition()))
                .then_with(|| a.set_number().cmp(&b.set_number()))
        });

        let compounds: Vec<Compound> = Compound::ALL
            .into_iter()
            .filter(|compound| pool.iter().any(|(_, set)| set.compound() == *compound))
            .collect();

        let mut candidates = Vec::new();
        for sequence in self.sequences(&compounds) {
            if let Some(sets) = assign_sets(&sequence, &pool) {
                candidates.push(StintCandidate {
                    index: candidates.len(),
                    sets,
                });
            }
        }
        candidates
    }
}

/// Odometer step over `digits` in base `base`, last stint fastest. Returns
/// false once every combination has been produced.
fn advance(digits: &mut [usize], base: usize) -> bool {
    for digit in digits.iter_mut().rev() {
        *digit += 1;
        if *digit < base {
            return true;
        }
        *digit = 0;
    }
    false
}

fn has_two_compounds(sequence: &[Compound]) -> bool {
    sequence.iter().any(|compound| *compound != sequence[0])
}

/// Best remaining set per stint; `pool` is already in preference order.
fn assign_sets(sequence: &[Compound], pool: &[(Tier, &TireSet)]) -> Option<Vec<TireSet>> {
    let mut used: Vec<u32> = Vec::with_capacity(sequence.len());
    let mut sets = Vec::with_capacity(sequence.len());
    for compound in sequence {
        let (_, set) = pool
            .iter()
            .find(|(_, set)| set.compound() == *compound && !used.contains(&set.set_number()))?;
        used.push(set.set_number());
        sets.push((*set).clone());
    }
    Some(sets)
}
