//! Left/right mirror normalization
//!
//! A pose held on the other side of the body should still match the same
//! reference. Applying either function twice gives back the input.

use super::angles::{Joint, JointAngles};
use super::landmarks::MIRROR_PAIRS;
use super::vectorize::CoordinateVector;

/// Angle pairs swapped by [`mirror_angles`]; spine and neck sit on the centre line
const ANGLE_MIRROR_PAIRS: [(Joint, Joint); 7] = [
    (Joint::LeftShoulder, Joint::RightShoulder),
    (Joint::LeftElbow, Joint::RightElbow),
    (Joint::LeftWrist, Joint::RightWrist),
    (Joint::LeftHip, Joint::RightHip),
    (Joint::LeftKnee, Joint::RightKnee),
    (Joint::LeftAnkle, Joint::RightAnkle),
    (Joint::LeftHipShoulderAlign, Joint::RightHipShoulderAlign),
];

/// Negate every x, then swap each left/right landmark triple wholesale
pub fn mirror_vector(vector: &CoordinateVector) -> CoordinateVector {
    let mut mirrored = vector.clone();
    let values = mirrored.as_mut_slice();

    for x in values.iter_mut().step_by(3) {
        *x = -*x;
    }

    for (left, right) in MIRROR_PAIRS {
        let (l, r) = (left * 3, right * 3);
        // Short vectors (e.g. limb vectors) have no such joints
        if r + 3 > values.len() || l + 3 > values.len() {
            continue;
        }
        for axis in 0..3 {
            values.swap(l + axis, r + axis);
        }
    }

    mirrored
}

/// Swap the left/right-named angles
pub fn mirror_angles(angles: &JointAngles) -> JointAngles {
    let mut mirrored = *angles;
    for (left, right) in ANGLE_MIRROR_PAIRS {
        *mirrored.get_mut(left) = angles.get(right);
        *mirrored.get_mut(right) = angles.get(left);
    }
    mirrored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::landmarks::{LANDMARK_COUNT, LEFT_ELBOW, NOSE, RIGHT_ELBOW};

    fn numbered_vector() -> CoordinateVector {
        let triples: Vec<[f32; 3]> = (0..LANDMARK_COUNT)
            .map(|i| [i as f32 + 1.0, -(i as f32), 0.5 * i as f32])
            .collect();
        CoordinateVector::from_triples(&triples)
    }

    #[test]
    fn test_flips_x_and_swaps_pairs() {
        let v = numbered_vector();
        let m = mirror_vector(&v);
        let left = v.joint(LEFT_ELBOW).unwrap();
        let right = v.joint(RIGHT_ELBOW).unwrap();
        assert_eq!(m.joint(LEFT_ELBOW).unwrap(), [-right[0], right[1], right[2]]);
        assert_eq!(m.joint(RIGHT_ELBOW).unwrap(), [-left[0], left[1], left[2]]);
    }

    #[test]
    fn test_centre_line_joint_only_flips() {
        let v = numbered_vector();
        let m = mirror_vector(&v);
        let nose = v.joint(NOSE).unwrap();
        assert_eq!(m.joint(NOSE).unwrap(), [-nose[0], nose[1], nose[2]]);
    }

    #[test]
    fn test_vector_mirror_is_involution() {
        let v = numbered_vector();
        assert_eq!(mirror_vector(&mirror_vector(&v)), v);
    }

    #[test]
    fn test_short_vector_only_flips() {
        let v = CoordinateVector::from_triples(&[[1.0, 2.0, 3.0]]);
        assert_eq!(mirror_vector(&v).as_slice(), &[-1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_angle_mirror_swaps_sides_and_keeps_centre() {
        let mut angles = JointAngles::uniform(120.0);
        angles.left_knee = 90.0;
        angles.spine = 170.0;
        angles.neck_angle = 150.0;
        let m = mirror_angles(&angles);
        assert_eq!(m.right_knee, 90.0);
        assert_eq!(m.left_knee, 120.0);
        assert_eq!(m.spine, 170.0);
        assert_eq!(m.neck_angle, 150.0);
        assert_eq!(mirror_angles(&m), angles);
    }
}
