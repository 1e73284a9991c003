//! Classifier integration - engine setup and one-off scoring calls
//!
//! The pose library and the tuning config are loaded here. A running
//! session keeps the config and library it was started with.

use std::sync::Arc;

use wasm_bindgen::prelude::*;

use super::engine::with_engine;
use crate::classifier::PoseLibrary;
use crate::config::EngineConfig;
use crate::error::{self, EngineError};
use crate::pose::{
    calculate_all_angles as angles_of, parse_landmarks, vectorize_with_visibility, CoordinateVector,
    JointAngles,
};

fn to_vector(values: &[f32]) -> error::Result<CoordinateVector> {
    CoordinateVector::try_from(values.to_vec())
}

fn parse_angles(json: Option<&str>) -> error::Result<Option<JointAngles>> {
    json.map(serde_json::from_str::<JointAngles>)
        .transpose()
        .map_err(|e| EngineError::Serialization(format!("angle set: {e}")))
}

/// Flat landmark array to the engine's coordinate vector
fn vectorize_flat(landmarks: &[f32], height: f32, width: f32, config: &EngineConfig) -> error::Result<Vec<f32>> {
    let landmarks = parse_landmarks(landmarks)?;
    Ok(vectorize_with_visibility(&landmarks, height, width, config.min_visibility).into())
}

/// Flat world landmark array to an angle set JSON, blended with `previous`
fn angles_json(world: &[f32], previous: Option<&str>, config: &EngineConfig) -> error::Result<String> {
    let world = parse_landmarks(world)?;
    let previous = parse_angles(previous)?;
    let angles = angles_of(&world, previous.as_ref(), config.angle_smoothing);
    serde_json::to_string(&angles).map_err(|e| EngineError::Serialization(e.to_string()))
}

/// Replace the engine config with a (partial) JSON object
#[wasm_bindgen]
pub fn configure_engine(json: &str) -> Result<(), JsValue> {
    let config = EngineConfig::from_json(json)?;
    with_engine(|engine| engine.config = config);
    web_sys::console::log_1(&"Engine configured".into());
    Ok(())
}

/// Load the reference pose library; returns the number of poses
#[wasm_bindgen]
pub fn load_pose_library(json: &str) -> Result<usize, JsValue> {
    let library = PoseLibrary::from_json(json)?;
    let count = library.len();
    with_engine(|engine| engine.library = Arc::new(library));
    web_sys::console::log_1(&format!("✅ {count} reference poses loaded").into());
    Ok(count)
}

/// Coordinate vector of one frame of image landmarks, in the same frame the
/// pose library and the scorer use
#[wasm_bindgen]
pub fn vectorize(landmarks: &[f32], height: f32, width: f32) -> Result<Vec<f32>, JsValue> {
    let vector = with_engine(|engine| vectorize_flat(landmarks, height, width, &engine.config))?;
    Ok(vector)
}

/// Joint angle set JSON of one frame of world landmarks, smoothed against
/// the previous set when one is given
#[wasm_bindgen]
pub fn calculate_all_angles(world: &[f32], previous_json: Option<String>) -> Result<String, JsValue> {
    let json = with_engine(|engine| angles_json(world, previous_json.as_deref(), &engine.config))?;
    Ok(json)
}

/// Positional similarity of two coordinate vectors (0-100)
#[wasm_bindgen]
pub fn calculate_similarity(a: &[f32], b: &[f32], lambda: f32) -> Result<f32, JsValue> {
    let (a, b) = (to_vector(a)?, to_vector(b)?);
    Ok(crate::similarity::calculate_similarity(&a, &b, lambda))
}

/// Classify one coordinate vector (and optional angle set JSON) against the
/// loaded library; returns `{"bestPose": .., "score": ..}`
#[wasm_bindgen]
pub fn classify_pose(vector: &[f32], angles_json: Option<String>) -> Result<String, JsValue> {
    let vector = to_vector(vector)?;
    let angles = parse_angles(angles_json.as_deref())?;

    let result = with_engine(|engine| {
        crate::classifier::classify_pose(&engine.library, &vector, angles.as_ref(), &engine.config)
    });
    Ok(serde_json::to_string(&result).map_err(|e| EngineError::Serialization(e.to_string()))?)
}
