//! In-memory store for the one live match plus per-board calibrations.
//!
//! All engine operations are synchronous, bounded, and non-I/O, so plain
//! mutexes serialize the writers and readers always see a fully-applied
//! state. Handlers clone a snapshot out rather than holding the lock.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::engine::board::BoardCalibration;
use crate::engine::dart::Dart;
use crate::engine::error::EngineError;
use crate::engine::match_state::{MatchConfig, MatchState};

pub struct MatchStore {
    state: Mutex<MatchState>,
    calibrations: Mutex<HashMap<String, BoardCalibration>>,
}

impl MatchStore {
    pub fn new(config: MatchConfig) -> Self {
        Self::with_calibrations(config, HashMap::new())
    }

    pub fn with_calibrations(
        config: MatchConfig,
        calibrations: HashMap<String, BoardCalibration>,
    ) -> Self {
        Self {
            state: Mutex::new(MatchState::new(config)),
            calibrations: Mutex::new(calibrations),
        }
    }

    /// A consistent snapshot of the current match.
    pub fn snapshot(&self) -> MatchState {
        self.state.lock().expect("match state mutex poisoned").clone()
    }

    pub fn config(&self) -> MatchConfig {
        self.state
            .lock()
            .expect("match state mutex poisoned")
            .config
            .clone()
    }

    pub fn submit_visit(&self, darts: &[Dart]) -> Result<MatchState, EngineError> {
        let mut state = self.state.lock().expect("match state mutex poisoned");
        state.apply_visit(darts)?;
        Ok(state.clone())
    }

    pub fn undo(&self) -> Result<MatchState, EngineError> {
        let mut state = self.state.lock().expect("match state mutex poisoned");
        state.undo()?;
        Ok(state.clone())
    }

    pub fn reset(&self) -> MatchState {
        let mut state = self.state.lock().expect("match state mutex poisoned");
        state.reset();
        state.clone()
    }

    pub fn calibration(&self, board_id: &str) -> Option<BoardCalibration> {
        self.calibrations
            .lock()
            .expect("calibration mutex poisoned")
            .get(board_id)
            .cloned()
    }

    pub fn set_calibration(&self, board_id: &str, calib: BoardCalibration) {
        self.calibrations
            .lock()
            .expect("calibration mutex poisoned")
            .insert(board_id.to_string(), calib);
    }
}
