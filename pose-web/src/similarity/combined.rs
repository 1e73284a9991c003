//! Per-frame similarity between the reference and the live user
//!
//! Combines the positional and angular scores into the single number the
//! timeline averages. The heel-to-foot term is kept but weighted 0 by
//! default; it only contributes when a host config turns it on.

use serde::Serialize;

use super::angular::angular_similarity;
use super::positional::{calculate_similarity, cos_and_euc, mixed_score};
use crate::config::EngineConfig;
use crate::pose::{
    mirror_angles, mirror_vector, CoordinateVector, JointAngles, LEFT_FOOT_INDEX, LEFT_HEEL,
    RIGHT_FOOT_INDEX, RIGHT_HEEL,
};

/// Exponent that sharpens the heel-to-foot agreement
const HEEL_FOOT_SHARPNESS: i32 = 10;

/// Scores of one reference/user frame pair, all 0-100
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    pub positional_score: f32,
    pub angular_score: f32,
    pub combined_score: f32,
    /// Whether the user side was scored left/right flipped
    pub mirrored: bool,
}

impl SimilarityResult {
    /// Score the user against the reference. Missing angle sets skip the
    /// angular term instead of failing.
    pub fn evaluate(
        reference: &CoordinateVector,
        user: &CoordinateVector,
        reference_angles: Option<&JointAngles>,
        user_angles: Option<&JointAngles>,
        config: &EngineConfig,
    ) -> Self {
        let direct = Self::evaluate_oriented(reference, user, reference_angles, user_angles, config);
        if !config.mirror_tolerant {
            return direct;
        }

        let mirrored_user = mirror_vector(user);
        let mirrored_angles = user_angles.map(mirror_angles);
        let mut mirrored = Self::evaluate_oriented(
            reference,
            &mirrored_user,
            reference_angles,
            mirrored_angles.as_ref(),
            config,
        );
        mirrored.mirrored = true;

        if mirrored.combined_score > direct.combined_score {
            mirrored
        } else {
            direct
        }
    }

    fn evaluate_oriented(
        reference: &CoordinateVector,
        user: &CoordinateVector,
        reference_angles: Option<&JointAngles>,
        user_angles: Option<&JointAngles>,
        config: &EngineConfig,
    ) -> Self {
        let positional_score = calculate_similarity(reference, user, config.positional_lambda);

        let (angular_score, mut combined_score) = match (reference_angles, user_angles) {
            (Some(r), Some(u)) => {
                let angular = angular_similarity(r, u);
                let w = config.angular_weight;
                (angular, w * angular + (1.0 - w) * positional_score)
            }
            _ => (0.0, positional_score),
        };

        if config.heel_foot_weight > 0.0 {
            let h = config.heel_foot_weight;
            combined_score = (1.0 - h) * combined_score + h * heel_foot_similarity(reference, user);
        }

        Self {
            positional_score,
            angular_score,
            combined_score: combined_score.clamp(0.0, 100.0),
            mirrored: false,
        }
    }
}

/// Vector from joint `from` to joint `to`, `None` when either is hidden
fn limb_vector(vector: &CoordinateVector, from: usize, to: usize) -> Option<[f32; 3]> {
    if !vector.is_visible(from) || !vector.is_visible(to) {
        return None;
    }
    let a = vector.joint(from)?;
    let b = vector.joint(to)?;
    Some([b[0] - a[0], b[1] - a[1], b[2] - a[2]])
}

fn limb_similarity(reference: &CoordinateVector, user: &CoordinateVector, from: usize, to: usize) -> f32 {
    match (limb_vector(reference, from, to), limb_vector(user, from, to)) {
        (Some(r), Some(u)) => mixed_score(cos_and_euc(&r, &u).as_ref(), 1.0),
        _ => 0.0,
    }
}

/// Agreement of the heel-to-toe direction of both feet, sharpened so that
/// only near-exact foot placement scores high
pub fn heel_foot_similarity(reference: &CoordinateVector, user: &CoordinateVector) -> f32 {
    let left = limb_similarity(reference, user, LEFT_HEEL, LEFT_FOOT_INDEX);
    let right = limb_similarity(reference, user, RIGHT_HEEL, RIGHT_FOOT_INDEX);
    let similarity = (left + right) / 2.0;
    (similarity / 100.0).powi(HEEL_FOOT_SHARPNESS) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::fixtures::spread_vector;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn test_identical_frames_score_100() {
        let v = spread_vector();
        let a = JointAngles::uniform(120.0);
        let r = SimilarityResult::evaluate(&v, &v, Some(&a), Some(&a), &config());
        assert_eq!(r.positional_score, 100.0);
        assert_eq!(r.angular_score, 100.0);
        assert_eq!(r.combined_score, 100.0);
        assert!(!r.mirrored);
    }

    #[test]
    fn test_missing_angles_fall_back_to_positional() {
        let v = spread_vector();
        let a = JointAngles::uniform(120.0);
        let r = SimilarityResult::evaluate(&v, &v, Some(&a), None, &config());
        assert_eq!(r.angular_score, 0.0);
        assert_eq!(r.combined_score, r.positional_score);
    }

    #[test]
    fn test_combined_weights_angular_share() {
        let v = spread_vector();
        let reference = JointAngles::uniform(120.0);
        let mut user = reference;
        user.neck_angle = 30.0;

        let cfg = EngineConfig { mirror_tolerant: false, ..config() };
        let r = SimilarityResult::evaluate(&v, &v, Some(&reference), Some(&user), &cfg);
        let expected = 0.5 * r.angular_score + 0.5 * r.positional_score;
        assert!((r.combined_score - expected).abs() < 1e-4);
        assert!(r.combined_score < 100.0);
    }

    #[test]
    fn test_mirrored_user_is_recognized() {
        let reference = spread_vector();
        let user = mirror_vector(&reference);

        let strict = EngineConfig { mirror_tolerant: false, ..config() };
        let direct = SimilarityResult::evaluate(&reference, &user, None, None, &strict);
        let tolerant = SimilarityResult::evaluate(&reference, &user, None, None, &config());

        assert!(tolerant.mirrored);
        assert_eq!(tolerant.combined_score, 100.0);
        assert!(direct.combined_score < tolerant.combined_score);
    }

    #[test]
    fn test_heel_foot_term_is_off_by_default() {
        let v = spread_vector();
        let mut values = v.as_slice().to_vec();
        // Point the user's left foot backwards
        values[LEFT_FOOT_INDEX * 3] = values[LEFT_HEEL * 3] - 5.0;
        let user = CoordinateVector::try_from(values).unwrap();

        let strict = EngineConfig { mirror_tolerant: false, ..config() };
        let off = SimilarityResult::evaluate(&v, &user, None, None, &strict);
        assert_eq!(off.combined_score, off.positional_score);

        let on = EngineConfig { heel_foot_weight: 0.5, ..strict };
        let with_heel = SimilarityResult::evaluate(&v, &user, None, None, &on);
        assert!(with_heel.combined_score < off.combined_score);
    }

    #[test]
    fn test_heel_foot_identity() {
        let v = spread_vector();
        assert!((heel_foot_similarity(&v, &v) - 100.0).abs() < 1e-3);
    }
}
