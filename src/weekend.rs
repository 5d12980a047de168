//! Weekend orchestration: allocation, inventory, session plans, race search.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::allocation::{Allocation, AllocationOverride};
use crate::config::EngineConfig;
use crate::error::PlanError;
use crate::inventory::Inventory;
use crate::planner::{SessionPlan, SessionPlanner};
use crate::predictor::{
    LapTimePredictor, ReferencePaceModel, StaticWeather, TimeoutPredictor, WeatherSupplier,
};
use crate::session::{SessionType, WeekendFormat};
use crate::strategy::{plan_race_strategies, RaceStrategy};
use crate::track::{TrackCatalog, TrackProfile};

/// Everything one planning run produces for a weekend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekendStrategy {
    pub track_id: String,
    pub format: WeekendFormat,
    pub allocation: Allocation,
    pub sessions: BTreeMap<SessionType, SessionPlan>,
    pub race_strategies: BTreeMap<String, RaceStrategy>,
    /// Inventory state handed to the strategy search.
    pub post_qualifying: Inventory,
}

impl WeekendStrategy {
    /// Race strategies in rank order.
    pub fn ranked(&self) -> impl Iterator<Item = &RaceStrategy> {
        // plan_a..plan_z sort correctly as strings; plan_27+ follow them.
        let mut strategies: Vec<&RaceStrategy> = self.race_strategies.values().collect();
        strategies.sort_by_key(|strategy| (strategy.id.len(), strategy.id.clone()));
        strategies.into_iter()
    }
}

pub struct WeekendPlanner {
    config: EngineConfig,
    catalog: TrackCatalog,
    predictor: Option<Arc<dyn LapTimePredictor>>,
    weather: Arc<dyn WeatherSupplier>,
}

impl Default for WeekendPlanner {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl WeekendPlanner {
    /// Planner scoring with [ReferencePaceModel] under constant default weather.
    pub fn new(config: EngineConfig) -> Self {
        let catalog = TrackCatalog::with_extra(&config.tracks);
        Self {
            config,
            catalog,
            predictor: None,
            weather: Arc::new(StaticWeather::default()),
        }
    }

    pub fn with_predictor(mut self, predictor: Arc<dyn LapTimePredictor>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    pub fn with_weather(mut self, weather: Arc<dyn WeatherSupplier>) -> Self {
        self.weather = weather;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &TrackCatalog {
        &self.catalog
    }

    /// Allocation and freshly issued inventory for `format`.
    pub fn issue_inventory(
        &self,
        format: WeekendFormat,
        allocation_override: Option<&AllocationOverride>,
    ) -> Result<(Allocation, Inventory), PlanError> {
        let allocation = self.config.allocation.for_format(format, allocation_override)?;
        let inventory = Inventory::build(&allocation, &self.config.degradation);
        Ok((allocation, inventory))
    }

    pub fn plan_weekend(
        &self,
        track_id: &str,
        format: WeekendFormat,
        allocation_override: Option<&AllocationOverride>,
    ) -> Result<WeekendStrategy, PlanError> {
        let track = self
            .catalog
            .resolve(track_id)
            .ok_or_else(|| PlanError::UnknownTrack(track_id.to_string()))?;

        let (allocation, mut inventory) = self.issue_inventory(format, allocation_override)?;
        tracing::info!(
            track = %track.id,
            %format,
            sets = inventory.len(),
            "inventory issued"
        );

        let planner = SessionPlanner::new(self.config.sessions.programs(format).to_vec());
        let mut sessions = planner.plan_sessions(&mut inventory)?;
        tracing::info!(sessions = sessions.len(), "pre-race sessions planned");

        let predictor = TimeoutPredictor::new(self.predictor_for(track), self.config.predictor.timeout());
        let mut options = self.config.strategy_options();
        if let Some(pit_loss) = track.pit_loss_s {
            options.pit_penalty_s = pit_loss;
        }
        let strategies = plan_race_strategies(
            &inventory,
            track.total_laps,
            &predictor,
            self.weather.as_ref(),
            &options,
        )?;
        let best = strategies.first().ok_or_else(|| {
            PlanError::NoFeasibleStrategy(format!("no strategy ranked for {}", track.id))
        })?;
        tracing::info!(
            strategies = strategies.len(),
            best = %best.name,
            "race strategies ranked"
        );
        sessions.insert(SessionType::Race, race_plan(best, track.total_laps));

        Ok(WeekendStrategy {
            track_id: track.id.clone(),
            format,
            allocation,
            sessions,
            race_strategies: strategies
                .into_iter()
                .map(|strategy| (strategy.id.clone(), strategy))
                .collect(),
            post_qualifying: inventory,
        })
    }

    fn predictor_for(&self, track: &TrackProfile) -> Arc<dyn LapTimePredictor> {
        match &self.predictor {
            Some(predictor) => Arc::clone(predictor),
            None => Arc::new(ReferencePaceModel {
                base_lap_time_s: track.base_lap_time_s,
                ..self.config.predictor.reference
            }),
        }
    }
}

/// The race entry of the session map, taken from the top-ranked strategy.
/// Recording it does not wear any set.
fn race_plan(best: &RaceStrategy, total_laps: u32) -> SessionPlan {
    SessionPlan {
        session_type: SessionType::Race,
        tire_sets_used: best.stints.iter().map(|stint| stint.tire_set).collect(),
        compounds_used: best.stints.iter().map(|stint| stint.compound).collect(),
        target_laps: total_laps,
        actual_laps: total_laps,
        objectives: vec![best.name.clone()],
    }
}

/// Plan a weekend with default configuration and the reference pace model.
pub fn plan_weekend(
    track_id: &str,
    format: WeekendFormat,
    allocation_override: Option<&AllocationOverride>,
) -> Result<WeekendStrategy, PlanError> {
    WeekendPlanner::default().plan_weekend(track_id, format, allocation_override)
}
