//! Bounded waits on a slow or hung predictor.
//!
//! Each stint batch runs on a helper thread; the caller waits at most `timeout`
//! for the answer. A batch that misses the deadline is abandoned and reported
//! as [PredictorError::Timeout].

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::error::PredictorError;
use crate::predictor::{LapContext, LapTimePredictor};
use crate::tyre::Compound;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Clone)]
pub struct TimeoutPredictor {
    inner: Arc<dyn LapTimePredictor>,
    timeout: Duration,
}

impl TimeoutPredictor {
    pub fn new(inner: Arc<dyn LapTimePredictor>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn run_bounded<T, F>(&self, job: F) -> Result<T, PredictorError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn LapTimePredictor) -> Result<T, PredictorError> + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(1);
        let inner = Arc::clone(&self.inner);
        thread::Builder::new()
            .name("lap-time-predictor".to_string())
            .spawn(move || {
                // The receiver is gone if the caller already timed out.
                let _ = sender.send(job(inner.as_ref()));
            })
            .map_err(|err| PredictorError::Failed(format!("could not start predictor call: {err}")))?;

        match receiver.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "lap-time predictor timed out");
                Err(PredictorError::Timeout(self.timeout))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(PredictorError::Failed("predictor call panicked".to_string()))
            }
        }
    }
}

impl LapTimePredictor for TimeoutPredictor {
    fn predict_lap_time(
        &self,
        compound: Compound,
        tire_age_laps: u32,
        context: &LapContext,
    ) -> Result<f64, PredictorError> {
        let context = *context;
        self.run_bounded(move |inner| inner.predict_lap_time(compound, tire_age_laps, &context))
    }

    fn predict_stint(
        &self,
        compound: Compound,
        start_age: u32,
        contexts: &[LapContext],
    ) -> Result<Vec<f64>, PredictorError> {
        let contexts = contexts.to_vec();
        self.run_bounded(move |inner| inner.predict_stint(compound, start_age, &contexts))
    }
}
