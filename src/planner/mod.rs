pub mod programs;
pub mod rules;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::inventory::Inventory;
use crate::session::SessionType;
use crate::tyre::Compound;

pub use programs::{default_programs, SessionProgram, SessionSchedule};
pub use rules::{IntentRule, SelectionRule, SessionIntent, SetPreference};

/// Tire usage recorded for one session. A new plan is produced for every
/// planning run; plans are never edited afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub session_type: SessionType,
    pub tire_sets_used: Vec<u32>,
    pub compounds_used: Vec<Compound>,
    /// Laps planned on each selected set. The RACE entry is the exception: there
    /// it is the race distance, covered by the stints together.
    pub target_laps: u32,
    /// Laps actually applied to each set; equals `target_laps` unless overridden.
    /// For the RACE entry, the race distance again; no set is worn by it.
    pub actual_laps: u32,
    pub objectives: Vec<String>,
}

/// Walks the pre-race sessions in order, planning each one and wearing the
/// chosen sets before the next session is considered.
pub struct SessionPlanner {
    programs: Vec<SessionProgram>,
    rule: Box<dyn SelectionRule>,
    actual_laps: BTreeMap<SessionType, u32>,
}

impl SessionPlanner {
    /// Planner using the [IntentRule] carried by the programs themselves.
    pub fn new(programs: Vec<SessionProgram>) -> Self {
        let intents = programs
            .iter()
            .map(|program| (program.session, program.intent.clone()))
            .collect();
        Self {
            programs,
            rule: Box::new(IntentRule::new(intents)),
            actual_laps: BTreeMap::new(),
        }
    }

    pub fn with_rule(mut self, rule: Box<dyn SelectionRule>) -> Self {
        self.rule = rule;
        self
    }

    /// Run `laps` per set in `session` instead of the program's target.
    pub fn with_actual_laps(mut self, session: SessionType, laps: u32) -> Self {
        self.actual_laps.insert(session, laps);
        self
    }

    pub fn programs(&self) -> &[SessionProgram] {
        &self.programs
    }

    pub fn plan_sessions(
        &self,
        inventory: &mut Inventory,
    ) -> Result<BTreeMap<SessionType, SessionPlan>, PlanError> {
        let mut plans = BTreeMap::new();
        for program in &self.programs {
            let plan = self.plan_session(program, inventory)?;
            plans.insert(program.session, plan);
        }
        Ok(plans)
    }

    /// Plan one session and apply its wear to `inventory`.
    pub fn plan_session(
        &self,
        program: &SessionProgram,
        inventory: &mut Inventory,
    ) -> Result<SessionPlan, PlanError> {
        let session = program.session;
        let selected = self.rule.select(session, inventory, program.target_laps)?;
        if selected.is_empty() {
            return Err(PlanError::InvalidRequest(format!(
                "selection rule returned no sets for {session}"
            )));
        }

        let mut compounds = Vec::with_capacity(selected.len());
        for (index, set_number) in selected.iter().enumerate() {
            if selected[..index].contains(set_number) {
                return Err(PlanError::InvalidRequest(format!(
                    "set {set_number} selected twice for {session}"
                )));
            }
            let set = inventory.get(*set_number).ok_or_else(|| PlanError::InvalidUsage {
                set_number: *set_number,
                reason: "set is not part of the inventory".to_string(),
            })?;
            if set.is_retired() {
                return Err(PlanError::InvalidUsage {
                    set_number: *set_number,
                    reason: "set is retired".to_string(),
                });
            }
            compounds.push(set.compound());
        }

        let actual_laps = self
            .actual_laps
            .get(&session)
            .copied()
            .unwrap_or(program.target_laps);

        let plan = SessionPlan {
            session_type: session,
            tire_sets_used: selected,
            compounds_used: compounds,
            target_laps: program.target_laps,
            actual_laps,
            objectives: program.objectives.clone(),
        };

        for set_number in &plan.tire_sets_used {
            inventory.use_set(*set_number, actual_laps, session)?;
        }

        tracing::debug!(
            %session,
            sets = ?plan.tire_sets_used,
            laps = actual_laps,
            "session planned"
        );
        Ok(plan)
    }
}
