//! Landmark entry points for the two detection loops
//!
//! Each loop calls its own function with a flat `Float32Array` of 99
//! (`x,y,z`) or 132 (`x,y,z,visibility`) values, plus the world landmarks
//! when the detector provides them.

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

use super::engine::with_engine;
use crate::error;
use crate::pose::{parse_landmarks, PoseLandmarks};

#[derive(Clone, Copy)]
enum Source {
    Reference,
    Webcam,
}

fn parse_frame(landmarks: &[f32], world: Option<&[f32]>) -> error::Result<(PoseLandmarks, Option<PoseLandmarks>)> {
    let landmarks = parse_landmarks(landmarks)?;
    let world = world.map(parse_landmarks).transpose()?;
    Ok((landmarks, world))
}

fn update(source: Source, landmarks: &[f32], world: Option<Float32Array>, height: f32, width: f32) -> error::Result<String> {
    let (landmarks, world) = parse_frame(landmarks, world.map(|w| w.to_vec()).as_deref()).map_err(|e| {
        web_sys::console::warn_1(&e.to_string().into());
        e
    })?;

    with_engine(|engine| {
        let session = engine.running_session()?;
        let frame = match source {
            Source::Reference => session.process_reference(&landmarks, world.as_ref(), height, width),
            Source::Webcam => session.process_webcam(&landmarks, world.as_ref(), height, width),
        };
        Ok(frame.pose.clone())
    })
}

/// Feed one reference-video frame; returns the debounced pose label
#[wasm_bindgen]
pub fn update_reference_landmarks(
    landmarks: &[f32],
    world: Option<Float32Array>,
    height: f32,
    width: f32,
) -> Result<String, JsValue> {
    Ok(update(Source::Reference, landmarks, world, height, width)?)
}

/// Feed one webcam frame; returns the debounced pose label
#[wasm_bindgen]
pub fn update_webcam_landmarks(
    landmarks: &[f32],
    world: Option<Float32Array>,
    height: f32,
    width: f32,
) -> Result<String, JsValue> {
    Ok(update(Source::Webcam, landmarks, world, height, width)?)
}
