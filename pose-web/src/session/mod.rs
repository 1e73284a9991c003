//! Session module - per-source detection streams and the workout session
//!
//! Re-exports only. All logic in submodules.

mod stream;
mod workout;

pub use stream::{DetectionStream, FrameResult};
pub use workout::WorkoutSession;
