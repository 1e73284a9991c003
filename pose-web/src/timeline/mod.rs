//! Timeline module - pose segments and the persisted workout record
//!
//! Re-exports only. All logic in submodules.

mod segment;
mod record;

pub use segment::{SegmentSnapshot, Timeline, TimelineSegment};
pub use record::{RecordSegment, WorkoutRecord};
