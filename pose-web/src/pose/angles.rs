//! Joint angle calculation using dot product
//!
//! Derives the named joint angles from 3D world landmarks and blends them
//! with the previous frame's angles to calm detector jitter.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use super::landmarks::*;

/// Number of named angles in a [`JointAngles`] set
pub const JOINT_COUNT: usize = 16;

/// The closed set of measured joints and alignments
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Joint {
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftHipShoulderAlign,
    RightHipShoulderAlign,
    Spine,
    Neck,
}

impl Joint {
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
        Joint::LeftHipShoulderAlign,
        Joint::RightHipShoulderAlign,
        Joint::Spine,
        Joint::Neck,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name used by the host page and the pose library JSON
    pub fn as_str(self) -> &'static str {
        match self {
            Joint::LeftShoulder => "leftShoulder",
            Joint::RightShoulder => "rightShoulder",
            Joint::LeftElbow => "leftElbow",
            Joint::RightElbow => "rightElbow",
            Joint::LeftWrist => "leftWrist",
            Joint::RightWrist => "rightWrist",
            Joint::LeftHip => "leftHip",
            Joint::RightHip => "rightHip",
            Joint::LeftKnee => "leftKnee",
            Joint::RightKnee => "rightKnee",
            Joint::LeftAnkle => "leftAnkle",
            Joint::RightAnkle => "rightAnkle",
            Joint::LeftHipShoulderAlign => "leftHipShoulderAlign",
            Joint::RightHipShoulderAlign => "rightHipShoulderAlign",
            Joint::Spine => "spine",
            Joint::Neck => "neckAngle",
        }
    }
}

/// One angle in degrees (0-180) per [`Joint`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JointAngles {
    pub left_shoulder: f32,
    pub right_shoulder: f32,
    pub left_elbow: f32,
    pub right_elbow: f32,
    pub left_wrist: f32,
    pub right_wrist: f32,
    pub left_hip: f32,
    pub right_hip: f32,
    pub left_knee: f32,
    pub right_knee: f32,
    pub left_ankle: f32,
    pub right_ankle: f32,
    pub left_hip_shoulder_align: f32,
    pub right_hip_shoulder_align: f32,
    pub spine: f32,
    pub neck_angle: f32,
}

impl JointAngles {
    pub fn get(&self, joint: Joint) -> f32 {
        match joint {
            Joint::LeftShoulder => self.left_shoulder,
            Joint::RightShoulder => self.right_shoulder,
            Joint::LeftElbow => self.left_elbow,
            Joint::RightElbow => self.right_elbow,
            Joint::LeftWrist => self.left_wrist,
            Joint::RightWrist => self.right_wrist,
            Joint::LeftHip => self.left_hip,
            Joint::RightHip => self.right_hip,
            Joint::LeftKnee => self.left_knee,
            Joint::RightKnee => self.right_knee,
            Joint::LeftAnkle => self.left_ankle,
            Joint::RightAnkle => self.right_ankle,
            Joint::LeftHipShoulderAlign => self.left_hip_shoulder_align,
            Joint::RightHipShoulderAlign => self.right_hip_shoulder_align,
            Joint::Spine => self.spine,
            Joint::Neck => self.neck_angle,
        }
    }

    pub fn get_mut(&mut self, joint: Joint) -> &mut f32 {
        match joint {
            Joint::LeftShoulder => &mut self.left_shoulder,
            Joint::RightShoulder => &mut self.right_shoulder,
            Joint::LeftElbow => &mut self.left_elbow,
            Joint::RightElbow => &mut self.right_elbow,
            Joint::LeftWrist => &mut self.left_wrist,
            Joint::RightWrist => &mut self.right_wrist,
            Joint::LeftHip => &mut self.left_hip,
            Joint::RightHip => &mut self.right_hip,
            Joint::LeftKnee => &mut self.left_knee,
            Joint::RightKnee => &mut self.right_knee,
            Joint::LeftAnkle => &mut self.left_ankle,
            Joint::RightAnkle => &mut self.right_ankle,
            Joint::LeftHipShoulderAlign => &mut self.left_hip_shoulder_align,
            Joint::RightHipShoulderAlign => &mut self.right_hip_shoulder_align,
            Joint::Spine => &mut self.spine,
            Joint::Neck => &mut self.neck_angle,
        }
    }

    /// Every joint set to the same angle (handy for tests and fixtures)
    pub fn uniform(degrees: f32) -> Self {
        let mut angles = Self::default();
        for joint in Joint::ALL {
            *angles.get_mut(joint) = degrees;
        }
        angles
    }
}

/// Angle at `vertex` between the rays to `a` and `b`, in degrees
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
pub fn angle_between(a: Vector3<f32>, vertex: Vector3<f32>, b: Vector3<f32>) -> f32 {
    let v1 = a - vertex;
    let v2 = b - vertex;

    let mag1 = v1.norm();
    let mag2 = v2.norm();

    // Handle degenerate case
    if mag1 < 0.0001 || mag2 < 0.0001 {
        return 180.0;
    }

    let cos_angle = (v1.dot(&v2) / (mag1 * mag2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Unsmoothed angles of one frame of world landmarks
pub fn raw_angles(world: &PoseLandmarks) -> JointAngles {
    let p = |i: usize| Vector3::new(world[i].x, world[i].y, world[i].z);
    let mid = |a: usize, b: usize| (p(a) + p(b)) * 0.5;

    let mid_shoulder = mid(LEFT_SHOULDER, RIGHT_SHOULDER);
    let mid_hip = mid(LEFT_HIP, RIGHT_HIP);
    let mid_knee = mid(LEFT_KNEE, RIGHT_KNEE);

    JointAngles {
        left_shoulder: angle_between(p(LEFT_ELBOW), p(LEFT_SHOULDER), p(LEFT_HIP)),
        right_shoulder: angle_between(p(RIGHT_ELBOW), p(RIGHT_SHOULDER), p(RIGHT_HIP)),
        left_elbow: angle_between(p(LEFT_SHOULDER), p(LEFT_ELBOW), p(LEFT_WRIST)),
        right_elbow: angle_between(p(RIGHT_SHOULDER), p(RIGHT_ELBOW), p(RIGHT_WRIST)),
        left_wrist: angle_between(p(LEFT_ELBOW), p(LEFT_WRIST), p(LEFT_INDEX)),
        right_wrist: angle_between(p(RIGHT_ELBOW), p(RIGHT_WRIST), p(RIGHT_INDEX)),
        left_hip: angle_between(p(LEFT_SHOULDER), p(LEFT_HIP), p(LEFT_KNEE)),
        right_hip: angle_between(p(RIGHT_SHOULDER), p(RIGHT_HIP), p(RIGHT_KNEE)),
        left_knee: angle_between(p(LEFT_HIP), p(LEFT_KNEE), p(LEFT_ANKLE)),
        right_knee: angle_between(p(RIGHT_HIP), p(RIGHT_KNEE), p(RIGHT_ANKLE)),
        left_ankle: angle_between(p(LEFT_KNEE), p(LEFT_ANKLE), p(LEFT_FOOT_INDEX)),
        right_ankle: angle_between(p(RIGHT_KNEE), p(RIGHT_ANKLE), p(RIGHT_FOOT_INDEX)),
        left_hip_shoulder_align: angle_between(p(RIGHT_HIP), p(LEFT_HIP), p(LEFT_SHOULDER)),
        right_hip_shoulder_align: angle_between(p(LEFT_HIP), p(RIGHT_HIP), p(RIGHT_SHOULDER)),
        spine: angle_between(mid_shoulder, mid_hip, mid_knee),
        neck_angle: angle_between(p(NOSE), mid_shoulder, mid_hip),
    }
}

/// Angles of the current frame, blended with `previous` when there is one.
///
/// `smoothing` is the weight of the new measurement. The returned set is
/// also the smoothing state for the next frame.
pub fn calculate_all_angles(
    world: &PoseLandmarks,
    previous: Option<&JointAngles>,
    smoothing: f32,
) -> JointAngles {
    let raw = raw_angles(world);
    let Some(previous) = previous else {
        return raw;
    };

    let mut smoothed = raw;
    for joint in Joint::ALL {
        let x = raw.get(joint);
        let x_prev = previous.get(joint);
        *smoothed.get_mut(joint) = (smoothing * x + (1.0 - smoothing) * x_prev).clamp(0.0, 180.0);
    }
    smoothed
}

/// Per-stream smoothing state: the last angles handed out
#[derive(Clone, Debug)]
pub struct AngleTracker {
    previous: Option<JointAngles>,
    smoothing: f32,
}

impl AngleTracker {
    pub fn new(smoothing: f32) -> Self {
        Self { previous: None, smoothing }
    }

    pub fn update(&mut self, world: &PoseLandmarks) -> JointAngles {
        let angles = calculate_all_angles(world, self.previous.as_ref(), self.smoothing);
        self.previous = Some(angles);
        angles
    }

    pub fn previous(&self) -> Option<&JointAngles> {
        self.previous.as_ref()
    }

    pub fn set_smoothing(&mut self, smoothing: f32) {
        self.smoothing = smoothing;
    }

    /// Forget the last frame (the next update is returned unsmoothed)
    pub fn reset(&mut self) {
        self.previous = None;
    }
}
