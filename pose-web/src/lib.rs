//! Pose Web - workout pose matching engine for the browser
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - Re-exports of the library API and the wasm_bindgen entry points

pub mod classifier;
pub mod config;
pub mod error;
pub mod pose;
pub mod session;
pub mod similarity;
pub mod timeline;

mod bridge;

use wasm_bindgen::prelude::*;

pub use classifier::{classify_pose, Classification, Debouncer, PoseLibrary, ReferencePose, UNKNOWN_POSE};
pub use config::EngineConfig;
pub use error::EngineError;
pub use pose::{calculate_all_angles, vectorize, CoordinateVector, JointAngles, Landmark, PoseLandmarks};
pub use session::{DetectionStream, FrameResult, WorkoutSession};
pub use similarity::{calculate_similarity, SimilarityResult};
pub use timeline::{Timeline, TimelineSegment, WorkoutRecord};

// Re-export wasm_bindgen functions for JS access
pub mod wasm {
    pub use crate::bridge::{
        calculate_all_angles, calculate_similarity, classify_pose, configure_engine, end_session,
        get_session_start_timestamp, get_similarity, get_timeline, load_pose_library,
        session_tick, start_session, update_reference_landmarks, update_webcam_landmarks,
        vectorize,
    };
}

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    bridge::init_logging(level);
    console_log!("✅ Pose engine v{} loaded", env!("CARGO_PKG_VERSION"));
}
