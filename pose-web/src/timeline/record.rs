//! Workout record handed to persistence when a session ends
//!
//! Field names follow the record API (`youtube_start_sec`, `timeLineList`, ...).
//! Offsets are whole seconds from the session start, scores whole percent.

use serde::{Deserialize, Serialize};

use super::segment::Timeline;
use crate::error::{EngineError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordSegment {
    #[serde(rename = "youtube_start_sec")]
    pub start_offset_seconds: u32,
    #[serde(rename = "youtube_end_sec")]
    pub end_offset_seconds: u32,
    #[serde(rename = "pose")]
    pub pose_name: String,
    #[serde(rename = "score")]
    pub score_percent: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    #[serde(rename = "workingout_time")]
    pub total_duration_seconds: u32,
    #[serde(rename = "total_score")]
    pub average_score: u32,
    #[serde(rename = "timeLineList")]
    pub segments: Vec<RecordSegment>,
}

fn offset_seconds(timestamp: f64, session_start: f64) -> u32 {
    ((timestamp - session_start) / 1000.0).floor().max(0.0) as u32
}

impl WorkoutRecord {
    /// Build the record from a finished timeline.
    ///
    /// Every segment must be closed: an open one means the caller never
    /// signalled the end of the session, and inventing an end time for it
    /// would persist a wrong duration.
    pub fn from_timeline(timeline: &Timeline, session_end: f64) -> Result<Self> {
        if let Some(open) = timeline.open_segment() {
            return Err(EngineError::OpenSegmentAtTeardown {
                pose: open.pose_name().to_string(),
            });
        }
        if timeline.segments().is_empty() {
            return Err(EngineError::EmptyTimeline);
        }

        let start = timeline.session_start_timestamp();
        let segments: Vec<RecordSegment> = timeline
            .segments()
            .iter()
            .map(|s| RecordSegment {
                start_offset_seconds: offset_seconds(s.start_timestamp(), start),
                end_offset_seconds: offset_seconds(s.end_timestamp(), start),
                pose_name: s.pose_name().to_string(),
                score_percent: s.average_similarity().round().max(0.0) as u32,
            })
            .collect();

        let mean = timeline
            .segments()
            .iter()
            .map(|s| s.average_similarity() as f64)
            .sum::<f64>()
            / segments.len() as f64;

        Ok(Self {
            total_duration_seconds: offset_seconds(session_end, start),
            average_score: mean.round().max(0.0) as u32,
            segments,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| EngineError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::UNKNOWN_POSE;

    fn finished_timeline() -> Timeline {
        let mut t = Timeline::new(1_000.0);
        t.observe(1_000.0, "A", None);
        t.observe(2_000.0, "A", Some(80.4));
        t.observe(4_500.0, "B", None);
        t.observe(5_000.0, "B", Some(61.0));
        t.observe(7_900.0, UNKNOWN_POSE, None);
        t.end_session(10_999.0);
        t
    }

    #[test]
    fn test_record_rows() {
        let record = WorkoutRecord::from_timeline(&finished_timeline(), 10_999.0).unwrap();
        assert_eq!(record.total_duration_seconds, 9);
        assert_eq!(record.average_score, 71);
        assert_eq!(
            record.segments,
            vec![
                RecordSegment {
                    start_offset_seconds: 0,
                    end_offset_seconds: 3,
                    pose_name: "A".into(),
                    score_percent: 80,
                },
                RecordSegment {
                    start_offset_seconds: 3,
                    end_offset_seconds: 6,
                    pose_name: "B".into(),
                    score_percent: 61,
                },
            ]
        );
    }

    #[test]
    fn test_open_segment_is_a_caller_error() {
        let mut t = Timeline::new(0.0);
        t.observe(0.0, "A", None);
        let err = WorkoutRecord::from_timeline(&t, 5_000.0).unwrap_err();
        assert_eq!(err, EngineError::OpenSegmentAtTeardown { pose: "A".into() });
    }

    #[test]
    fn test_empty_timeline_is_rejected() {
        let mut t = Timeline::new(0.0);
        t.end_session(1_000.0);
        assert_eq!(WorkoutRecord::from_timeline(&t, 1_000.0), Err(EngineError::EmptyTimeline));
    }

    #[test]
    fn test_json_uses_record_api_names() {
        let record = WorkoutRecord::from_timeline(&finished_timeline(), 10_999.0).unwrap();
        let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(json["workingout_time"], 9);
        assert_eq!(json["timeLineList"][1]["pose"], "B");
        assert_eq!(json["timeLineList"][0]["youtube_end_sec"], 3);
    }
}
