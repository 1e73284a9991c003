//! Landmark vectorizer
//!
//! Flattens one frame of image landmarks into the fixed-order coordinate
//! vector the scorer works on. Joint identity is the triple's position.

use serde::{Deserialize, Serialize};

use super::landmarks::{
    PoseLandmarks, LEFT_HIP, LEFT_SHOULDER, RIGHT_HIP, RIGHT_SHOULDER,
};
use crate::error::EngineError;

/// Default visibility cut-off for `vectorize`
pub const DEFAULT_MIN_VISIBILITY: f32 = 0.5;

/// Flat `(x, y, z)` triples, one per joint. An all-zero triple means the
/// joint was not visible in that frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f32>", into = "Vec<f32>")]
pub struct CoordinateVector(Vec<f32>);

impl CoordinateVector {
    pub fn from_triples(triples: &[[f32; 3]]) -> Self {
        Self(triples.iter().flatten().copied().collect())
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn joint_count(&self) -> usize {
        self.0.len() / 3
    }

    /// Triple of joint `i`, `None` past the end
    pub fn joint(&self, i: usize) -> Option<[f32; 3]> {
        let start = i * 3;
        self.0.get(start..start + 3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn is_visible(&self, i: usize) -> bool {
        self.joint(i).is_some_and(|[x, y, z]| x != 0.0 || y != 0.0 || z != 0.0)
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.0
    }
}

impl TryFrom<Vec<f32>> for CoordinateVector {
    type Error = EngineError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        if values.len() % 3 != 0 {
            return Err(EngineError::InvalidLandmarks {
                got: values.len(),
                expected: values.len() - values.len() % 3 + 3,
            });
        }
        Ok(Self(values))
    }
}

impl From<CoordinateVector> for Vec<f32> {
    fn from(vector: CoordinateVector) -> Self {
        vector.0
    }
}

/// Vectorize with the default visibility cut-off
pub fn vectorize(landmarks: &PoseLandmarks, frame_height: f32, frame_width: f32) -> CoordinateVector {
    vectorize_with_visibility(landmarks, frame_height, frame_width, DEFAULT_MIN_VISIBILITY)
}

/// Project to pixel space, drop low-visibility joints to the zero sentinel,
/// then centre on the hips and scale by torso length.
///
/// Without both hips and both shoulders the torso frame is unknown; the
/// vector is then only centred on the frame centre.
pub fn vectorize_with_visibility(
    landmarks: &PoseLandmarks,
    frame_height: f32,
    frame_width: f32,
    min_visibility: f32,
) -> CoordinateVector {
    let to_pixels = |i: usize| {
        let lm = landmarks[i];
        [lm.x * frame_width, lm.y * frame_height, lm.z * frame_width]
    };
    let visible = |i: usize| landmarks[i].visibility >= min_visibility;
    let midpoint = |a: [f32; 3], b: [f32; 3]| {
        [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0, (a[2] + b[2]) / 2.0]
    };

    let torso_frame = if visible(LEFT_HIP) && visible(RIGHT_HIP) && visible(LEFT_SHOULDER) && visible(RIGHT_SHOULDER) {
        let hips = midpoint(to_pixels(LEFT_HIP), to_pixels(RIGHT_HIP));
        let shoulders = midpoint(to_pixels(LEFT_SHOULDER), to_pixels(RIGHT_SHOULDER));
        let torso = ((shoulders[0] - hips[0]).powi(2)
            + (shoulders[1] - hips[1]).powi(2)
            + (shoulders[2] - hips[2]).powi(2))
        .sqrt();
        (torso > 1e-6).then_some((hips, torso))
    } else {
        None
    };

    let (origin, scale) = torso_frame
        .unwrap_or(([frame_width / 2.0, frame_height / 2.0, 0.0], 1.0));

    let triples: Vec<[f32; 3]> = (0..landmarks.len())
        .map(|i| {
            if !visible(i) {
                return [0.0; 3];
            }
            let p = to_pixels(i);
            [
                (p[0] - origin[0]) / scale,
                (p[1] - origin[1]) / scale,
                (p[2] - origin[2]) / scale,
            ]
        })
        .collect();

    CoordinateVector::from_triples(&triples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::landmarks::{Landmark, LANDMARK_COUNT, NOSE};

    fn standing() -> PoseLandmarks {
        let mut lms = [Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        lms[LEFT_SHOULDER] = Landmark::new(0.6, 0.3, 0.0);
        lms[RIGHT_SHOULDER] = Landmark::new(0.4, 0.3, 0.0);
        lms[LEFT_HIP] = Landmark::new(0.6, 0.5, 0.0);
        lms[RIGHT_HIP] = Landmark::new(0.4, 0.5, 0.0);
        lms[NOSE] = Landmark::new(0.5, 0.2, 0.0);
        lms
    }

    #[test]
    fn test_vector_has_one_triple_per_landmark() {
        let v = vectorize(&standing(), 480.0, 640.0);
        assert_eq!(v.len(), LANDMARK_COUNT * 3);
        assert_eq!(v.joint_count(), LANDMARK_COUNT);
    }

    #[test]
    fn test_centred_on_hips_and_scaled_by_torso() {
        let v = vectorize(&standing(), 100.0, 100.0);
        // Torso is 20 px, nose is 30 px above the hip centre
        let nose = v.joint(NOSE).unwrap();
        assert!(nose[0].abs() < 1e-5);
        assert!((nose[1] + 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_invisible_landmarks_become_sentinel() {
        let mut lms = standing();
        lms[NOSE] = lms[NOSE].with_visibility(0.1);
        let v = vectorize(&lms, 100.0, 100.0);
        assert!(!v.is_visible(NOSE));
        assert!(v.is_visible(LEFT_SHOULDER));
    }

    #[test]
    fn test_scale_invariant_across_frame_sizes() {
        let small = vectorize(&standing(), 100.0, 100.0);
        let large = vectorize(&standing(), 1000.0, 1000.0);
        for (a, b) in small.as_slice().iter().zip(large.as_slice()) {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn test_deserialize_rejects_partial_triple() {
        let parsed: Result<CoordinateVector, _> = serde_json::from_str("[1.0, 2.0]");
        assert!(parsed.is_err());
        let parsed: CoordinateVector = serde_json::from_str("[1.0, 2.0, 3.0]").unwrap();
        assert_eq!(parsed.joint(0), Some([1.0, 2.0, 3.0]));
    }
}
