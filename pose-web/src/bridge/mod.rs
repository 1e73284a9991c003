//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod classifier_integration;
mod console;
mod engine;
mod landmarks;
mod timeline;

pub use classifier_integration::{
    calculate_all_angles, calculate_similarity, classify_pose, configure_engine, load_pose_library,
    vectorize,
};
pub use console::init_logging;
pub use landmarks::{update_reference_landmarks, update_webcam_landmarks};
pub use timeline::{
    end_session, get_session_start_timestamp, get_similarity, get_timeline, session_tick,
    start_session,
};
