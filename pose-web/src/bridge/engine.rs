//! Engine state shared by the bridge entry points
//!
//! WASM is single-threaded, so the whole engine lives in one thread-local
//! cell. Each entry point borrows it for the duration of one call.

use std::cell::RefCell;
use std::sync::Arc;

use crate::classifier::PoseLibrary;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::session::WorkoutSession;

#[derive(Default)]
pub(crate) struct EngineState {
    pub config: EngineConfig,
    pub library: Arc<PoseLibrary>,
    /// Current or last finished session
    pub session: Option<WorkoutSession>,
}

impl EngineState {
    /// Session that has not been ended yet
    pub fn running_session(&mut self) -> Result<&mut WorkoutSession> {
        self.session
            .as_mut()
            .filter(|s| s.timeline().session_end_timestamp().is_none())
            .ok_or(EngineError::NoSession)
    }

    /// Replace the current session with a fresh one.
    ///
    /// A running session that already recorded segments must be ended
    /// first, otherwise its timeline would be dropped without a record.
    pub fn start_session(&mut self, now: f64) -> Result<()> {
        if self.library.is_empty() {
            return Err(EngineError::PoseLibrary("no reference poses loaded".into()));
        }
        if let Ok(running) = self.running_session() {
            let timeline = running.timeline();
            if let Some(open) = timeline.open_segment() {
                return Err(EngineError::OpenSegmentAtTeardown {
                    pose: open.pose_name().to_string(),
                });
            }
            if !timeline.segments().is_empty() {
                return Err(EngineError::SessionRunning);
            }
        }
        self.session = Some(WorkoutSession::new(self.library.clone(), self.config.clone(), now));
        Ok(())
    }
}

thread_local! {
    static ENGINE: RefCell<EngineState> = RefCell::new(EngineState::default());
}

pub(crate) fn with_engine<T>(f: impl FnOnce(&mut EngineState) -> T) -> T {
    ENGINE.with(|cell| f(&mut cell.borrow_mut()))
}
