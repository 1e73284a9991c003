//! One detection loop's state (reference video or live webcam)
//!
//! Each stream owns its angle smoothing, debounce window and latest frame.
//! The two streams of a session never share any of it.

use serde::Serialize;

use crate::classifier::{classify_pose, Classification, Debouncer, PoseLibrary};
use crate::config::EngineConfig;
use crate::pose::{vectorize_with_visibility, AngleTracker, CoordinateVector, JointAngles, PoseLandmarks};

/// Everything one processed frame produced
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResult {
    pub vector: CoordinateVector,
    /// `None` when the detector sent no world landmarks
    pub angles: Option<JointAngles>,
    /// Classifier output for this frame alone
    pub raw: Classification,
    /// Label committed by the debouncer after this frame
    pub pose: String,
}

#[derive(Clone, Debug)]
pub struct DetectionStream {
    angles: AngleTracker,
    debouncer: Debouncer,
    latest: Option<FrameResult>,
}

impl DetectionStream {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            angles: AngleTracker::new(config.angle_smoothing),
            debouncer: Debouncer::new(config.debounce_window, config.debounce_quorum),
            latest: None,
        }
    }

    /// Vectorize, measure angles, classify and debounce one frame.
    ///
    /// A frame without world landmarks keeps the smoothing state untouched,
    /// so the next frame that has them still blends against the last angles.
    pub fn process(
        &mut self,
        landmarks: &PoseLandmarks,
        world: Option<&PoseLandmarks>,
        frame_height: f32,
        frame_width: f32,
        library: &PoseLibrary,
        config: &EngineConfig,
    ) -> &FrameResult {
        let vector =
            vectorize_with_visibility(landmarks, frame_height, frame_width, config.min_visibility);

        self.angles.set_smoothing(config.angle_smoothing);
        let angles = world.map(|w| self.angles.update(w));

        let raw = classify_pose(library, &vector, angles.as_ref(), config);
        let pose = self.debouncer.push(&raw.best_pose).to_string();

        self.latest.insert(FrameResult {
            vector,
            angles,
            raw,
            pose,
        })
    }

    pub fn latest(&self) -> Option<&FrameResult> {
        self.latest.as_ref()
    }

    /// Debounced label ("unknown" until the window fills)
    pub fn committed_pose(&self) -> &str {
        self.debouncer.committed()
    }

    pub fn reset(&mut self) {
        self.angles.reset();
        self.debouncer.clear();
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ReferencePose, UNKNOWN_POSE};
    use crate::pose::fixtures::standing_world;
    use crate::pose::{calculate_all_angles, vectorize};

    fn library_from(landmarks: &PoseLandmarks) -> PoseLibrary {
        PoseLibrary::new(vec![ReferencePose {
            name: "mountain".into(),
            vector: vectorize(landmarks, 480.0, 640.0),
            angles: calculate_all_angles(landmarks, None, 1.0),
        }])
        .unwrap()
    }

    #[test]
    fn test_commits_after_quorum_frames() {
        let config = EngineConfig::default();
        let pose = standing_world();
        let library = library_from(&pose);
        let mut stream = DetectionStream::new(&config);

        for _ in 0..9 {
            let frame = stream.process(&pose, Some(&pose), 480.0, 640.0, &library, &config);
            assert_eq!(frame.raw.best_pose, "mountain");
            assert_eq!(frame.pose, UNKNOWN_POSE);
        }
        let frame = stream.process(&pose, Some(&pose), 480.0, 640.0, &library, &config);
        assert_eq!(frame.pose, "mountain");
        assert_eq!(stream.committed_pose(), "mountain");
    }

    #[test]
    fn test_missing_world_landmarks_skip_angles() {
        let config = EngineConfig::default();
        let pose = standing_world();
        let library = library_from(&pose);
        let mut stream = DetectionStream::new(&config);

        let frame = stream.process(&pose, None, 480.0, 640.0, &library, &config);
        assert!(frame.angles.is_none());
        assert_eq!(frame.raw.best_pose, "mountain");
    }

    #[test]
    fn test_reset_forgets_everything() {
        let config = EngineConfig {
            debounce_window: 1,
            debounce_quorum: 1,
            ..EngineConfig::default()
        };
        let pose = standing_world();
        let library = library_from(&pose);
        let mut stream = DetectionStream::new(&config);
        stream.process(&pose, Some(&pose), 480.0, 640.0, &library, &config);
        assert_eq!(stream.committed_pose(), "mountain");

        stream.reset();
        assert!(stream.latest().is_none());
        assert_eq!(stream.committed_pose(), UNKNOWN_POSE);
    }
}
