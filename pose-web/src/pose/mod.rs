//! Pose module - landmark layout, vectorization, joint angles, mirroring
//!
//! Re-exports only. All logic in submodules.

mod landmarks;
mod vectorize;
mod angles;
mod mirror;

pub use landmarks::*;
pub use vectorize::{vectorize, vectorize_with_visibility, CoordinateVector, DEFAULT_MIN_VISIBILITY};
pub use angles::{
    angle_between, calculate_all_angles, raw_angles, AngleTracker, Joint, JointAngles, JOINT_COUNT,
};
pub use mirror::{mirror_angles, mirror_vector};
