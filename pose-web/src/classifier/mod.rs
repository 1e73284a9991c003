//! Classifier module - reference library, per-frame matching, debouncing
//!
//! Re-exports only. All logic in submodules.

mod buffer;
mod library;
mod model;

pub use buffer::{Debouncer, DEBOUNCE_QUORUM, DEBOUNCE_WINDOW};
pub use library::{PoseLibrary, ReferencePose};
pub use model::{classify_pose, evaluate_candidates, Classification, PoseCandidate, UNKNOWN_POSE};
