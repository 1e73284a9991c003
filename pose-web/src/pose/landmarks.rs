//! MediaPipe Pose landmark layout
//!
//! The detector hands over 33 landmarks per frame as a flat Float32Array,
//! either `x, y, z` (99 values) or `x, y, z, visibility` (132 values).

use crate::error::{EngineError, Result};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_INDEX: usize = 19;
pub const RIGHT_INDEX: usize = 20;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;
pub const LEFT_HEEL: usize = 29;
pub const RIGHT_HEEL: usize = 30;
pub const LEFT_FOOT_INDEX: usize = 31;
pub const RIGHT_FOOT_INDEX: usize = 32;

/// Left/right landmark pairs swapped by the mirror normalizer
pub const MIRROR_PAIRS: [(usize, usize); 9] = [
    (LEFT_EAR, RIGHT_EAR),
    (LEFT_SHOULDER, RIGHT_SHOULDER),
    (LEFT_ELBOW, RIGHT_ELBOW),
    (LEFT_WRIST, RIGHT_WRIST),
    (LEFT_INDEX, RIGHT_INDEX),
    (LEFT_HIP, RIGHT_HIP),
    (LEFT_KNEE, RIGHT_KNEE),
    (LEFT_ANKLE, RIGHT_ANKLE),
    (LEFT_HEEL, RIGHT_HEEL),
];

// ============================================================================
// LANDMARK DATA STRUCTURE
// ============================================================================

/// A single landmark. Image landmarks are 0-1 normalized, world landmarks
/// are metres around the hip centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, visibility: 1.0 }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = visibility;
        self
    }
}

impl Default for Landmark {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

pub type PoseLandmarks = [Landmark; LANDMARK_COUNT];

/// Unpack a flat detector array of 99 (`x,y,z`) or 132 (`x,y,z,visibility`) values
pub fn parse_landmarks(data: &[f32]) -> Result<PoseLandmarks> {
    let stride = match data.len() {
        n if n == LANDMARK_COUNT * 3 => 3,
        n if n == LANDMARK_COUNT * 4 => 4,
        n => {
            return Err(EngineError::InvalidLandmarks {
                got: n,
                expected: LANDMARK_COUNT * 3,
            })
        }
    };

    let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
    for (i, chunk) in data.chunks_exact(stride).enumerate() {
        let landmark = Landmark::new(chunk[0], chunk[1], chunk[2]);
        landmarks[i] = if stride == 4 {
            landmark.with_visibility(chunk[3])
        } else {
            landmark
        };
    }
    Ok(landmarks)
}
