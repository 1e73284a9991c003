//! Angular similarity between two joint angle sets
//!
//! Each joint scores `1 - min(diff * penalty / 180, 1)`. Penalties and
//! weights are not a fixed table: they follow the body configuration of the
//! reference pose, so that joints which matter for that pose count more.

use crate::pose::{Joint, JointAngles, JOINT_COUNT};

/// Reference knee range treated as a bent-knee stance (exclusive)
const BENT_KNEE_RANGE: (f32, f32) = (80.0, 110.0);
/// How much straighter than the reference a knee may be before leniency kicks in
const KNEE_OVEREXTENSION_MARGIN: f32 = 10.0;
/// Penalty on knee/hip/ankle when the user is straighter than a bent reference
const OVEREXTENSION_PENALTY: f32 = 0.7;
/// Ankle penalty in a bent-knee stance otherwise
const BENT_STANCE_ANKLE_PENALTY: f32 = 1.5;

/// Reference elbow below this is a sharply bent arm
const BENT_ELBOW_MAX: f32 = 100.0;
const BENT_ELBOW_PENALTY: f32 = 0.5;
/// Reference elbow above this is a near-straight arm
const STRAIGHT_ELBOW_MIN: f32 = 130.0;

const CENTRE_LINE_PENALTY: f32 = 2.0;
const SPINE_WEIGHT: f32 = 3.0;

/// Per-joint penalty multipliers and weights for one comparison
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleWeights {
    penalty: [f32; JOINT_COUNT],
    weight: [f32; JOINT_COUNT],
}

struct Side {
    knee: Joint,
    hip: Joint,
    ankle: Joint,
    elbow: Joint,
    wrist: Joint,
    shoulder: Joint,
}

const LEFT: Side = Side {
    knee: Joint::LeftKnee,
    hip: Joint::LeftHip,
    ankle: Joint::LeftAnkle,
    elbow: Joint::LeftElbow,
    wrist: Joint::LeftWrist,
    shoulder: Joint::LeftShoulder,
};

const RIGHT: Side = Side {
    knee: Joint::RightKnee,
    hip: Joint::RightHip,
    ankle: Joint::RightAnkle,
    elbow: Joint::RightElbow,
    wrist: Joint::RightWrist,
    shoulder: Joint::RightShoulder,
};

impl Default for AngleWeights {
    fn default() -> Self {
        let mut weights = Self {
            penalty: [1.0; JOINT_COUNT],
            weight: [1.0; JOINT_COUNT],
        };
        weights.weight[Joint::Spine.index()] = SPINE_WEIGHT;
        weights
    }
}

impl AngleWeights {
    /// Weights for comparing `user` against `reference`
    pub fn adaptive(reference: &JointAngles, user: &JointAngles) -> Self {
        let mut w = Self::default();

        for side in [&LEFT, &RIGHT] {
            let ref_knee = reference.get(side.knee);
            if ref_knee > BENT_KNEE_RANGE.0 && ref_knee < BENT_KNEE_RANGE.1 {
                if user.get(side.knee) > ref_knee + KNEE_OVEREXTENSION_MARGIN {
                    w.set_penalty(side.knee, OVEREXTENSION_PENALTY);
                    w.set_penalty(side.hip, OVEREXTENSION_PENALTY);
                    w.set_penalty(side.ankle, OVEREXTENSION_PENALTY);
                } else {
                    w.set_penalty(side.ankle, BENT_STANCE_ANKLE_PENALTY);
                }
            }

            let ref_elbow = reference.get(side.elbow);
            if ref_elbow < BENT_ELBOW_MAX {
                w.set_penalty(side.elbow, BENT_ELBOW_PENALTY);
                w.set_penalty(side.wrist, BENT_ELBOW_PENALTY);
            } else if ref_elbow > STRAIGHT_ELBOW_MIN {
                // Shoulder angle says little once the arm is straight
                w.weight[side.shoulder.index()] = 0.0;
            }
        }

        w.set_penalty(Joint::Spine, CENTRE_LINE_PENALTY);
        w.set_penalty(Joint::LeftHipShoulderAlign, CENTRE_LINE_PENALTY);
        w.set_penalty(Joint::RightHipShoulderAlign, CENTRE_LINE_PENALTY);
        w
    }

    pub fn penalty(&self, joint: Joint) -> f32 {
        self.penalty[joint.index()]
    }

    pub fn weight(&self, joint: Joint) -> f32 {
        self.weight[joint.index()]
    }

    fn set_penalty(&mut self, joint: Joint, value: f32) {
        self.penalty[joint.index()] = value;
    }
}

/// Angular similarity (0-100) of `user` against `reference`
pub fn angular_similarity(reference: &JointAngles, user: &JointAngles) -> f32 {
    let weights = AngleWeights::adaptive(reference, user);

    let mut sum = 0.0;
    let mut total_weight = 0.0;
    for joint in Joint::ALL {
        let diff = (reference.get(joint) - user.get(joint)).abs();
        let norm_diff = (diff * weights.penalty(joint) / 180.0).min(1.0);
        let weight = weights.weight(joint);
        sum += (1.0 - norm_diff) * weight;
        total_weight += weight;
    }

    if total_weight <= 0.0 {
        return 0.0;
    }
    100.0 * sum / total_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_scores_100() {
        let mut angles = JointAngles::uniform(150.0);
        angles.left_knee = 95.0;
        angles.right_elbow = 60.0;
        assert_eq!(angular_similarity(&angles, &angles), 100.0);
        assert_eq!(angular_similarity(&JointAngles::default(), &JointAngles::default()), 100.0);
    }

    #[test]
    fn test_overextended_knee_is_lenient() {
        let mut reference = JointAngles::uniform(120.0);
        reference.left_knee = 95.0;
        let mut user = reference;
        user.left_knee = 110.0;

        let w = AngleWeights::adaptive(&reference, &user);
        assert_eq!(w.penalty(Joint::LeftKnee), 0.7);
        assert_eq!(w.penalty(Joint::LeftHip), 0.7);
        assert_eq!(w.penalty(Joint::LeftAnkle), 0.7);
        assert_eq!(w.penalty(Joint::RightKnee), 1.0);
    }

    #[test]
    fn test_bent_knee_without_overextension_is_strict_on_ankle() {
        let mut reference = JointAngles::uniform(120.0);
        reference.right_knee = 90.0;
        let mut user = reference;
        user.right_knee = 95.0;

        let w = AngleWeights::adaptive(&reference, &user);
        assert_eq!(w.penalty(Joint::RightAnkle), 1.5);
        assert_eq!(w.penalty(Joint::RightKnee), 1.0);
    }

    #[test]
    fn test_knee_range_bounds_are_exclusive() {
        let mut reference = JointAngles::uniform(120.0);
        reference.left_knee = 110.0;
        let w = AngleWeights::adaptive(&reference, &JointAngles::uniform(180.0));
        assert_eq!(w.penalty(Joint::LeftAnkle), 1.0);
    }

    #[test]
    fn test_elbow_rules() {
        let mut reference = JointAngles::uniform(120.0);
        reference.left_elbow = 70.0;
        reference.right_elbow = 170.0;

        let w = AngleWeights::adaptive(&reference, &reference);
        assert_eq!(w.penalty(Joint::LeftElbow), 0.5);
        assert_eq!(w.penalty(Joint::LeftWrist), 0.5);
        assert_eq!(w.weight(Joint::RightShoulder), 0.0);
        assert_eq!(w.weight(Joint::LeftShoulder), 1.0);
    }

    #[test]
    fn test_centre_line_penalties_and_spine_weight() {
        let w = AngleWeights::adaptive(&JointAngles::uniform(120.0), &JointAngles::uniform(120.0));
        assert_eq!(w.penalty(Joint::Spine), 2.0);
        assert_eq!(w.penalty(Joint::LeftHipShoulderAlign), 2.0);
        assert_eq!(w.penalty(Joint::RightHipShoulderAlign), 2.0);
        assert_eq!(w.weight(Joint::Spine), 3.0);
        assert_eq!(w.penalty(Joint::Neck), 1.0);
    }

    #[test]
    fn test_weighted_mean() {
        // Reference at 120 everywhere: no knee/elbow rules fire
        let reference = JointAngles::uniform(120.0);
        let mut user = reference;
        user.spine = 165.0; // 45 deg * penalty 2 -> similarity 0.5, weight 3
        user.neck_angle = 30.0; // 90 deg -> similarity 0.5, weight 1

        let expected = 100.0 * (14.0 + 0.5 * 3.0 + 0.5) / 18.0;
        assert!((angular_similarity(&reference, &user) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_difference_saturates_at_zero_similarity() {
        let reference = JointAngles::uniform(120.0);
        let user = JointAngles::uniform(0.0);
        // Centre-line joints saturate (120 * 2 > 180), the rest score 1/3
        let score = angular_similarity(&reference, &user);
        let expected = 100.0 * (13.0 / 3.0) / 18.0;
        assert!((score - expected).abs() < 1e-3);
    }
}
