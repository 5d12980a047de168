//! Session programs: lap targets, objectives and tire intent for each pre-race
//! session of a weekend format.

use serde::{Deserialize, Serialize};

use crate::planner::rules::{SessionIntent, SetPreference};
use crate::session::{SessionType, WeekendFormat};
use crate::tyre::Compound;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgram {
    pub session: SessionType,
    pub target_laps: u32,
    pub objectives: Vec<String>,
    #[serde(flatten)]
    pub intent: SessionIntent,
}

impl SessionProgram {
    fn new(
        session: SessionType,
        target_laps: u32,
        objectives: &[&str],
        intent: SessionIntent,
    ) -> Self {
        Self {
            session,
            target_laps,
            objectives: objectives.iter().map(|s| s.to_string()).collect(),
            intent,
        }
    }
}

/// Programs for both formats. Either list may be replaced from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSchedule {
    pub standard: Vec<SessionProgram>,
    pub sprint: Vec<SessionProgram>,
}

impl Default for SessionSchedule {
    fn default() -> Self {
        Self {
            standard: default_programs(WeekendFormat::Standard),
            sprint: default_programs(WeekendFormat::Sprint),
        }
    }
}

impl SessionSchedule {
    pub fn programs(&self, format: WeekendFormat) -> &[SessionProgram] {
        match format {
            WeekendFormat::Standard => &self.standard,
            WeekendFormat::Sprint => &self.sprint,
        }
    }

    /// Each format must list exactly its pre-race sessions, in order, with a
    /// positive lap target and at least one slot.
    pub fn validate(&self) -> Result<(), String> {
        for format in [WeekendFormat::Standard, WeekendFormat::Sprint] {
            let programs = self.programs(format);
            let sessions: Vec<SessionType> = programs.iter().map(|p| p.session).collect();
            if sessions != format.pre_race_sessions() {
                return Err(format!(
                    "{format} programs must cover {:?} in order, got {:?}",
                    format.pre_race_sessions(),
                    sessions
                ));
            }
            for program in programs {
                if program.target_laps == 0 {
                    return Err(format!("{format} {} target_laps must be > 0", program.session));
                }
                if program.intent.slots.is_empty() {
                    return Err(format!("{format} {} needs at least one slot", program.session));
                }
            }
        }
        Ok(())
    }
}

/// Built-in session programs. Each `target_laps` is a session's planned lap
/// total spread over its sets, rounded down: 25/35/20/12 laps for a standard
/// FP1/FP2/FP3/qualifying, and 30/9/17/12 for the sprint sessions.
pub fn default_programs(format: WeekendFormat) -> Vec<SessionProgram> {
    use Compound::{Hard, Medium, Soft};

    let qualifying = SessionProgram::new(
        SessionType::Qualifying,
        3,
        &[
            "Q1: one set for safety",
            "Q2: one or two sets to reach Q3",
            "Q3: best available sets",
        ],
        SessionIntent::new(vec![Soft; 4], vec![], SetPreference::Freshest),
    );

    match format {
        WeekendFormat::Standard => vec![
            SessionProgram::new(
                SessionType::Fp1,
                12,
                &["aero_balance", "mechanical_setup", "baseline_times"],
                SessionIntent::new(vec![Hard, Hard], vec![Medium, Soft], SetPreference::MostUsed),
            ),
            SessionProgram::new(
                SessionType::Fp2,
                11,
                &["race_pace", "tire_deg_data", "fuel_load_testing"],
                SessionIntent::new(vec![Medium, Medium, Soft], vec![Hard, Soft], SetPreference::MostUsed),
            ),
            SessionProgram::new(
                SessionType::Fp3,
                10,
                &["quali_sim", "final_setup", "low_fuel_pace"],
                SessionIntent::new(vec![Soft, Soft], vec![Medium], SetPreference::Freshest),
            ),
            qualifying,
        ],
        WeekendFormat::Sprint => vec![
            SessionProgram::new(
                SessionType::Fp1,
                7,
                &["full_setup", "quali_prep", "sprint_race_sim"],
                SessionIntent::new(vec![Hard, Hard, Soft, Soft], vec![Medium], SetPreference::MostUsed),
            ),
            SessionProgram::new(
                SessionType::SprintQualifying,
                3,
                &["SQ1: one set", "SQ2: one set", "SQ3: one fresh set"],
                SessionIntent::new(vec![Soft; 3], vec![], SetPreference::Freshest),
            ),
            SessionProgram::new(
                SessionType::Sprint,
                17,
                &["score_points", "gather_race_data", "minimize_risk"],
                SessionIntent::new(vec![Medium], vec![Soft, Hard], SetPreference::Freshest),
            ),
            qualifying,
        ],
    }
}
