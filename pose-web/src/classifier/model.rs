//! Per-frame pose classification against the reference library
//!
//! Every pose is scored in both orientations of the live measurement. The
//! orientation with the better angular agreement represents that pose; it
//! must clear both gates, and the highest angular score wins. Without angle
//! data the angular gate is open and the positional score ranks instead.

use serde::Serialize;

use super::library::PoseLibrary;
use crate::config::EngineConfig;
use crate::pose::{mirror_angles, mirror_vector, CoordinateVector, JointAngles};
use crate::similarity::{angular_similarity, calculate_similarity};

/// Label reported when no reference pose qualifies
pub const UNKNOWN_POSE: &str = "unknown";

/// Classifier output for one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub best_pose: String,
    /// Ranking score of the winner (0 when unknown)
    pub score: f32,
}

impl Classification {
    pub fn unknown() -> Self {
        Self {
            best_pose: UNKNOWN_POSE.to_string(),
            score: 0.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.best_pose == UNKNOWN_POSE
    }
}

/// Scores of one reference pose in its better orientation
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseCandidate {
    pub name: String,
    pub positional: f32,
    /// `None` when the frame carried no angle data
    pub angular: Option<f32>,
    pub mirrored: bool,
    pub qualifies: bool,
}

impl PoseCandidate {
    fn rank(&self) -> f32 {
        self.angular.unwrap_or(self.positional)
    }
}

/// Score every library pose against the live measurement
pub fn evaluate_candidates(
    library: &PoseLibrary,
    vector: &CoordinateVector,
    angles: Option<&JointAngles>,
    config: &EngineConfig,
) -> Vec<PoseCandidate> {
    let mirrored_vector = mirror_vector(vector);
    let mirrored_angles = angles.map(mirror_angles);

    library
        .iter()
        .map(|pose| {
            let positional = calculate_similarity(&pose.vector, vector, 1.0);
            let positional_mirrored = calculate_similarity(&pose.vector, &mirrored_vector, 1.0);

            let (positional, angular, mirrored) = match (angles, mirrored_angles.as_ref()) {
                (Some(a), Some(m)) => {
                    let original = angular_similarity(&pose.angles, a);
                    let flipped = angular_similarity(&pose.angles, m);
                    if flipped > original {
                        (positional_mirrored, Some(flipped), true)
                    } else {
                        (positional, Some(original), false)
                    }
                }
                _ if positional_mirrored > positional => (positional_mirrored, None, true),
                _ => (positional, None, false),
            };

            let qualifies = positional > config.positional_threshold
                && angular.map_or(true, |a| a > config.angular_threshold);

            PoseCandidate {
                name: pose.name.clone(),
                positional,
                angular,
                mirrored,
                qualifies,
            }
        })
        .collect()
}

/// Best qualifying reference pose, or "unknown"
pub fn classify_pose(
    library: &PoseLibrary,
    vector: &CoordinateVector,
    angles: Option<&JointAngles>,
    config: &EngineConfig,
) -> Classification {
    let mut best: Option<PoseCandidate> = None;
    for candidate in evaluate_candidates(library, vector, angles, config) {
        if !candidate.qualifies {
            continue;
        }
        if best.as_ref().map_or(true, |b| candidate.rank() > b.rank()) {
            best = Some(candidate);
        }
    }

    match best {
        Some(candidate) => Classification {
            score: candidate.rank(),
            best_pose: candidate.name,
        },
        None => Classification::unknown(),
    }
}
