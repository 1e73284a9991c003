//! Engine tuning parameters
//!
//! Every constant the scorer, classifier, debouncer and angle smoother use
//! lives here so the host page can override them with one JSON object.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cosine share of the live positional score (1 = cosine only)
    pub positional_lambda: f32,
    /// Classifier gate on the positional score (0-100)
    pub positional_threshold: f32,
    /// Classifier gate on the angular score (0-100)
    pub angular_threshold: f32,
    /// Sliding window length of the debouncer
    pub debounce_window: usize,
    /// Votes a label needs inside the window before it is committed
    pub debounce_quorum: usize,
    /// Weight of the new raw angle in the exponential blend (1 = no smoothing)
    pub angle_smoothing: f32,
    /// Share of the angular score in the combined score
    pub angular_weight: f32,
    /// Share of the heel-to-foot term in the combined score (0 = disabled)
    pub heel_foot_weight: f32,
    /// Landmarks below this visibility are vectorized as invisible
    pub min_visibility: f32,
    /// Also score the mirrored user pose and keep the better orientation
    pub mirror_tolerant: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            positional_lambda: 0.7,
            positional_threshold: 90.0,
            angular_threshold: 90.0,
            debounce_window: 10,
            debounce_quorum: 8,
            angle_smoothing: 0.6,
            angular_weight: 0.5,
            heel_foot_weight: 0.0,
            min_visibility: 0.5,
            mirror_tolerant: true,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON object; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, v: f32| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(EngineError::InvalidConfig(format!("{name} must be in [0, 1], got {v}")))
            }
        };
        let percent = |name: &str, v: f32| {
            if (0.0..=100.0).contains(&v) {
                Ok(())
            } else {
                Err(EngineError::InvalidConfig(format!("{name} must be in [0, 100], got {v}")))
            }
        };

        unit("positional_lambda", self.positional_lambda)?;
        unit("angular_weight", self.angular_weight)?;
        unit("heel_foot_weight", self.heel_foot_weight)?;
        unit("min_visibility", self.min_visibility)?;
        percent("positional_threshold", self.positional_threshold)?;
        percent("angular_threshold", self.angular_threshold)?;

        // Smoothing of 0 would freeze the first frame forever
        if !(self.angle_smoothing > 0.0 && self.angle_smoothing <= 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "angle_smoothing must be in (0, 1], got {}",
                self.angle_smoothing
            )));
        }
        if self.debounce_window == 0 {
            return Err(EngineError::InvalidConfig("debounce_window must be positive".into()));
        }
        if self.debounce_quorum == 0 || self.debounce_quorum > self.debounce_window {
            return Err(EngineError::InvalidConfig(format!(
                "debounce_quorum must be in [1, {}], got {}",
                self.debounce_window, self.debounce_quorum
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "angular_threshold": 95.0 }"#).unwrap();
        assert_eq!(config.angular_threshold, 95.0);
        assert_eq!(config.debounce_window, 10);
        assert_eq!(config.debounce_quorum, 8);
    }

    #[test]
    fn test_rejects_quorum_larger_than_window() {
        let err = EngineConfig::from_json(r#"{ "debounce_window": 5, "debounce_quorum": 8 }"#);
        assert!(matches!(err, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_out_of_range_lambda() {
        let err = EngineConfig::from_json(r#"{ "positional_lambda": 1.5 }"#);
        assert!(matches!(err, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(EngineConfig::from_json("{ nope").is_err());
    }
}
