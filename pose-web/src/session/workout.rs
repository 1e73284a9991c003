//! Workout session: reference stream, webcam stream and their timeline
//!
//! Both detection loops write into their own stream. `tick` is the only
//! place the two are combined: it scores the latest frames against each
//! other and advances the timeline with the reference's committed pose.

use std::sync::Arc;

use super::stream::{DetectionStream, FrameResult};
use crate::classifier::PoseLibrary;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::pose::PoseLandmarks;
use crate::similarity::SimilarityResult;
use crate::timeline::{Timeline, WorkoutRecord};

pub struct WorkoutSession {
    library: Arc<PoseLibrary>,
    config: EngineConfig,
    reference: DetectionStream,
    webcam: DetectionStream,
    timeline: Timeline,
    similarity: Option<SimilarityResult>,
}

impl WorkoutSession {
    pub fn new(library: Arc<PoseLibrary>, config: EngineConfig, session_start: f64) -> Self {
        log::info!(
            "workout session started at {session_start:.0} ms ({} reference poses)",
            library.len()
        );
        Self {
            reference: DetectionStream::new(&config),
            webcam: DetectionStream::new(&config),
            timeline: Timeline::new(session_start),
            similarity: None,
            library,
            config,
        }
    }

    /// Feed one frame of the reference video
    pub fn process_reference(
        &mut self,
        landmarks: &PoseLandmarks,
        world: Option<&PoseLandmarks>,
        frame_height: f32,
        frame_width: f32,
    ) -> &FrameResult {
        self.reference.process(
            landmarks,
            world,
            frame_height,
            frame_width,
            &self.library,
            &self.config,
        )
    }

    /// Feed one frame of the live webcam
    pub fn process_webcam(
        &mut self,
        landmarks: &PoseLandmarks,
        world: Option<&PoseLandmarks>,
        frame_height: f32,
        frame_width: f32,
    ) -> &FrameResult {
        self.webcam.process(
            landmarks,
            world,
            frame_height,
            frame_width,
            &self.library,
            &self.config,
        )
    }

    /// Score the latest pair of frames and advance the timeline.
    ///
    /// Until both streams have produced a frame there is no similarity; the
    /// timeline still follows the reference pose but takes no sample.
    pub fn tick(&mut self, now: f64) -> Option<SimilarityResult> {
        self.similarity = match (self.reference.latest(), self.webcam.latest()) {
            (Some(reference), Some(user)) => Some(SimilarityResult::evaluate(
                &reference.vector,
                &user.vector,
                reference.angles.as_ref(),
                user.angles.as_ref(),
                &self.config,
            )),
            _ => None,
        };

        self.timeline.observe(
            now,
            self.reference.committed_pose(),
            self.similarity.map(|s| s.combined_score),
        );
        self.similarity
    }

    /// Close the session and build the record to persist
    pub fn finish(&mut self, now: f64) -> Result<WorkoutRecord> {
        self.timeline.end_session(now);
        let record = WorkoutRecord::from_timeline(&self.timeline, now)?;
        log::info!(
            "workout session finished: {} segments, {} s, score {}",
            record.segments.len(),
            record.total_duration_seconds,
            record.average_score
        );
        Ok(record)
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Result of the last `tick`
    pub fn similarity(&self) -> Option<SimilarityResult> {
        self.similarity
    }

    pub fn reference(&self) -> &DetectionStream {
        &self.reference
    }

    pub fn webcam(&self) -> &DetectionStream {
        &self.webcam
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn library(&self) -> &Arc<PoseLibrary> {
        &self.library
    }
}
