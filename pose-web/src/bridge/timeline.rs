//! Session lifecycle and timeline queries
//!
//! Timestamps are host milliseconds from `performance.now()`.

use wasm_bindgen::prelude::*;

use super::engine::with_engine;
use crate::error::{self, EngineError};

fn to_json<T: serde::Serialize>(value: &T) -> error::Result<String> {
    serde_json::to_string(value).map_err(|e| EngineError::Serialization(e.to_string()))
}

/// Start a new session with the current library and config. A running
/// session with recorded segments has to be ended first.
#[wasm_bindgen]
pub fn start_session(now_ms: f64) -> Result<(), JsValue> {
    with_engine(|engine| engine.start_session(now_ms))?;
    Ok(())
}

/// Combine the latest frames of both streams and advance the timeline;
/// returns the combined score, 0 until both streams have reported
#[wasm_bindgen]
pub fn session_tick(now_ms: f64) -> Result<f32, JsValue> {
    let score = with_engine(|engine| {
        let session = engine.running_session()?;
        Ok::<_, EngineError>(session.tick(now_ms).map_or(0.0, |s| s.combined_score))
    })?;
    Ok(score)
}

/// Close the session; returns the workout record JSON
#[wasm_bindgen]
pub fn end_session(now_ms: f64) -> Result<String, JsValue> {
    let json = with_engine(|engine| {
        let record = engine.running_session()?.finish(now_ms)?;
        record.to_json()
    })?;
    Ok(json)
}

/// Segments of the current or last session as JSON
#[wasm_bindgen]
pub fn get_timeline() -> Result<String, JsValue> {
    let json = with_engine(|engine| match &engine.session {
        Some(session) => to_json(&session.timeline().snapshots()),
        None => Ok("[]".to_string()),
    })?;
    Ok(json)
}

/// Start timestamp of the current or last session, 0 without one
#[wasm_bindgen]
pub fn get_session_start_timestamp() -> f64 {
    with_engine(|engine| {
        engine
            .session
            .as_ref()
            .map_or(0.0, |s| s.timeline().session_start_timestamp())
    })
}

/// Scores of the last tick as JSON (all zero before the first pair)
#[wasm_bindgen]
pub fn get_similarity() -> Result<String, JsValue> {
    let json = with_engine(|engine| {
        let result = engine
            .session
            .as_ref()
            .and_then(|s| s.similarity())
            .unwrap_or_default();
        to_json(&result)
    })?;
    Ok(json)
}
