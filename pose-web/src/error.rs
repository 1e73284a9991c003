//! Engine error type
//!
//! Degenerate scorer input and missing angle data are recovered locally and
//! never show up here. These are the failures a caller has to act on.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid landmark data length: {got} (expected {expected})")]
    InvalidLandmarks { got: usize, expected: usize },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    #[error("pose library error: {0}")]
    PoseLibrary(String),

    #[error("no workout session is running")]
    NoSession,

    #[error("a workout session with recorded segments is still running; end it first")]
    SessionRunning,

    #[error("a segment for '{pose}' is still open; end the session before exporting")]
    OpenSegmentAtTeardown { pose: String },

    #[error("timeline has no segments to persist")]
    EmptyTimeline,

    #[error("serialization failed: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl From<EngineError> for wasm_bindgen::JsValue {
    fn from(err: EngineError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
