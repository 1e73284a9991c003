//! Timeline segmenter
//!
//! Turns the debounced pose stream into contiguous segments. Two states:
//! no open segment, or one open segment for the current pose. A segment's
//! similarity is the plain mean of the samples taken while it was open.
//!
//! Timestamps are monotonic host milliseconds (e.g. `performance.now()`),
//! never video playback time.

use serde::Serialize;

use crate::classifier::UNKNOWN_POSE;

/// One contiguous stretch of a single committed pose
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineSegment {
    pose_name: String,
    start_timestamp: f64,
    end_timestamp: Option<f64>,
    sample_sum: f64,
    sample_count: usize,
    average_similarity: f32,
}

impl TimelineSegment {
    fn open(pose_name: &str, now: f64) -> Self {
        Self {
            pose_name: pose_name.to_string(),
            start_timestamp: now,
            end_timestamp: None,
            sample_sum: 0.0,
            sample_count: 0,
            average_similarity: 0.0,
        }
    }

    fn add_sample(&mut self, similarity: f32) {
        self.sample_sum += similarity as f64;
        self.sample_count += 1;
    }

    fn close(&mut self, now: f64) {
        self.end_timestamp = Some(now.max(self.start_timestamp));
        self.average_similarity = self.running_average();
        self.sample_sum = 0.0;
        self.sample_count = 0;
    }

    /// Mean of the samples so far, 0 without samples
    fn running_average(&self) -> f32 {
        if self.sample_count == 0 {
            0.0
        } else {
            (self.sample_sum / self.sample_count as f64) as f32
        }
    }

    pub fn pose_name(&self) -> &str {
        &self.pose_name
    }

    pub fn start_timestamp(&self) -> f64 {
        self.start_timestamp
    }

    /// End time, 0 while the segment is still open
    pub fn end_timestamp(&self) -> f64 {
        self.end_timestamp.unwrap_or(0.0)
    }

    pub fn is_open(&self) -> bool {
        self.end_timestamp.is_none()
    }

    /// Final average once closed, running average while open
    pub fn average_similarity(&self) -> f32 {
        if self.is_open() {
            self.running_average()
        } else {
            self.average_similarity
        }
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }
}

/// Read-only view handed to the host page
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSnapshot {
    pub pose_name: String,
    pub start_timestamp: f64,
    pub end_timestamp: f64,
    pub average_similarity: f32,
}

impl From<&TimelineSegment> for SegmentSnapshot {
    fn from(segment: &TimelineSegment) -> Self {
        Self {
            pose_name: segment.pose_name.clone(),
            start_timestamp: segment.start_timestamp,
            end_timestamp: segment.end_timestamp(),
            average_similarity: segment.average_similarity(),
        }
    }
}

/// Ordered segments of one workout session
#[derive(Clone, Debug)]
pub struct Timeline {
    session_start: f64,
    segments: Vec<TimelineSegment>,
    /// Last debounced label seen, "unknown" included
    current_label: String,
    ended_at: Option<f64>,
}

impl Timeline {
    pub fn new(session_start: f64) -> Self {
        Self {
            session_start,
            segments: Vec::new(),
            current_label: UNKNOWN_POSE.to_string(),
            ended_at: None,
        }
    }

    /// Feed one frame: the debounced label and, when both streams had a
    /// measurement, the current combined similarity.
    ///
    /// A label change closes the open segment and, unless the new label is
    /// "unknown", opens the next one. Samples only count on frames where the
    /// label did not change. Frames after `end_session` are ignored.
    pub fn observe(&mut self, now: f64, label: &str, similarity: Option<f32>) {
        if self.ended_at.is_some() {
            return;
        }

        if label == self.current_label {
            if let (Some(segment), Some(similarity)) = (self.open_segment_mut(), similarity) {
                segment.add_sample(similarity);
            }
            return;
        }

        self.close_open_segment(now);
        if label != UNKNOWN_POSE {
            log::debug!("segment opened: {label} at {now:.0} ms");
            self.segments.push(TimelineSegment::open(label, now));
        }
        self.current_label.clear();
        self.current_label.push_str(label);
    }

    /// Close the open segment, if any, and stop accepting frames
    pub fn end_session(&mut self, now: f64) {
        if self.ended_at.is_some() {
            return;
        }
        self.close_open_segment(now);
        self.current_label = UNKNOWN_POSE.to_string();
        self.ended_at = Some(now);
    }

    fn close_open_segment(&mut self, now: f64) {
        if let Some(segment) = self.open_segment_mut() {
            segment.close(now);
            log::debug!(
                "segment closed: {} {:.0}-{:.0} ms, avg {:.1}",
                segment.pose_name,
                segment.start_timestamp,
                now,
                segment.average_similarity
            );
        }
    }

    fn open_segment_mut(&mut self) -> Option<&mut TimelineSegment> {
        self.segments.last_mut().filter(|s| s.is_open())
    }

    pub fn open_segment(&self) -> Option<&TimelineSegment> {
        self.segments.last().filter(|s| s.is_open())
    }

    pub fn segments(&self) -> &[TimelineSegment] {
        &self.segments
    }

    pub fn snapshots(&self) -> Vec<SegmentSnapshot> {
        self.segments.iter().map(SegmentSnapshot::from).collect()
    }

    pub fn session_start_timestamp(&self) -> f64 {
        self.session_start
    }

    /// Timestamp passed to `end_session`, if it was called
    pub fn session_end_timestamp(&self) -> Option<f64> {
        self.ended_at
    }

    /// Pose of the open segment
    pub fn current_pose(&self) -> Option<&str> {
        self.open_segment().map(|s| s.pose_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_segments_from_label_sequence() {
        let mut t = Timeline::new(0.0);
        t.observe(0.0, UNKNOWN_POSE, Some(50.0));
        t.observe(0.0, "A", Some(10.0));
        t.observe(500.0, "A", Some(80.0));
        t.observe(750.0, "A", Some(90.0));
        t.observe(1000.0, "B", Some(20.0));
        t.observe(1200.0, "B", Some(60.0));
        t.observe(1500.0, UNKNOWN_POSE, Some(99.0));

        let s = t.segments();
        assert_eq!(s.len(), 2);
        assert_eq!((s[0].pose_name(), s[0].start_timestamp(), s[0].end_timestamp()), ("A", 0.0, 1000.0));
        assert_eq!((s[1].pose_name(), s[1].start_timestamp(), s[1].end_timestamp()), ("B", 1000.0, 1500.0));
        assert_eq!(s[0].average_similarity(), 85.0);
        assert_eq!(s[1].average_similarity(), 60.0);
        assert!(t.open_segment().is_none());
    }

    #[test]
    fn test_at_most_one_open_segment() {
        let mut t = Timeline::new(0.0);
        t.observe(0.0, "A", None);
        t.observe(100.0, "B", None);
        t.observe(200.0, "C", None);
        assert_eq!(t.segments().iter().filter(|s| s.is_open()).count(), 1);
        assert_eq!(t.current_pose(), Some("C"));
        assert_eq!(t.open_segment().unwrap().end_timestamp(), 0.0);
    }

    #[test]
    fn test_segment_without_samples_averages_zero() {
        let mut t = Timeline::new(0.0);
        t.observe(0.0, "A", Some(70.0));
        t.observe(300.0, UNKNOWN_POSE, None);
        assert_eq!(t.segments()[0].average_similarity(), 0.0);
    }

    #[test]
    fn test_missing_samples_are_skipped() {
        let mut t = Timeline::new(0.0);
        t.observe(0.0, "A", None);
        t.observe(10.0, "A", Some(40.0));
        t.observe(20.0, "A", None);
        t.observe(30.0, "A", Some(60.0));
        assert_eq!(t.open_segment().unwrap().sample_count(), 2);
        assert_eq!(t.open_segment().unwrap().average_similarity(), 50.0);
    }

    #[test]
    fn test_end_session_force_closes() {
        let mut t = Timeline::new(100.0);
        t.observe(200.0, "A", None);
        t.observe(300.0, "A", Some(30.0));
        t.end_session(900.0);

        let s = &t.segments()[0];
        assert!(!s.is_open());
        assert_eq!(s.end_timestamp(), 900.0);
        assert_eq!(s.average_similarity(), 30.0);
        assert_eq!(t.session_start_timestamp(), 100.0);
        assert_eq!(t.session_end_timestamp(), Some(900.0));

        // Ignored after the session ended
        t.observe(1000.0, "B", Some(10.0));
        assert_eq!(t.segments().len(), 1);
    }

    #[test]
    fn test_returning_to_same_pose_opens_new_segment() {
        let mut t = Timeline::new(0.0);
        t.observe(0.0, "A", None);
        t.observe(100.0, UNKNOWN_POSE, None);
        t.observe(200.0, "A", None);
        assert_eq!(t.segments().len(), 2);
        assert_eq!(t.segments()[1].start_timestamp(), 200.0);
    }

    #[test]
    fn test_snapshot_shape() {
        let mut t = Timeline::new(0.0);
        t.observe(0.0, "A", None);
        let json = serde_json::to_value(t.snapshots()).unwrap();
        assert_eq!(json[0]["poseName"], "A");
        assert_eq!(json[0]["endTimestamp"], 0.0);
    }
}
