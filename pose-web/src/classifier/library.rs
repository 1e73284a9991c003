//! Reference pose library
//!
//! Loaded once at startup from JSON and never mutated afterwards. Both
//! detection streams read it through a shared handle.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::model::UNKNOWN_POSE;
use crate::error::{EngineError, Result};
use crate::pose::{CoordinateVector, JointAngles};

/// One named reference pose
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferencePose {
    pub name: String,
    pub vector: CoordinateVector,
    pub angles: JointAngles,
}

/// Immutable set of reference poses, in load order
#[derive(Clone, Debug, Default)]
pub struct PoseLibrary {
    poses: Vec<ReferencePose>,
}

impl PoseLibrary {
    /// Validate and wrap a list of poses.
    ///
    /// Names must be unique, non-empty and not the "unknown" label; all
    /// vectors must have the same non-zero length.
    pub fn new(poses: Vec<ReferencePose>) -> Result<Self> {
        let mut names = HashSet::new();
        let expected_len = poses.first().map(|p| p.vector.len());

        for pose in &poses {
            if pose.name.is_empty() || pose.name == UNKNOWN_POSE {
                return Err(EngineError::PoseLibrary(format!("invalid pose name '{}'", pose.name)));
            }
            if !names.insert(pose.name.as_str()) {
                return Err(EngineError::PoseLibrary(format!("duplicate pose '{}'", pose.name)));
            }
            if pose.vector.is_empty() || Some(pose.vector.len()) != expected_len {
                return Err(EngineError::PoseLibrary(format!(
                    "pose '{}' has a vector of {} values, expected {}",
                    pose.name,
                    pose.vector.len(),
                    expected_len.unwrap_or(0)
                )));
            }
        }

        Ok(Self { poses })
    }

    /// Parse `[{ "name": .., "vector": [..], "angles": { .. } }, ..]`
    pub fn from_json(json: &str) -> Result<Self> {
        let poses: Vec<ReferencePose> =
            serde_json::from_str(json).map_err(|e| EngineError::PoseLibrary(e.to_string()))?;
        let library = Self::new(poses)?;
        log::info!("loaded {} reference poses", library.len());
        Ok(library)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferencePose> {
        self.poses.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ReferencePose> {
        self.poses.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }
}
