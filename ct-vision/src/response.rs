//! This module parses the classifier's JSON answer into a [`HandSample`].

use crate::ClassifyError;
use ct_hand::{HandSample, InteractionState};
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;

/// The JSON object the classifier is asked to return.
#[derive(Debug, Deserialize)]
struct RawHandResponse {
    status: Option<String>,
    x: Option<Value>,
    y: Option<Value>,
}

/// Read a coordinate, defaulting to the centre of the frame when it's missing, zero, or not a
/// number.
fn coordinate(value: Option<&Value>) -> f32 {
    value
        .and_then(Value::as_f64)
        .map(|x| x as f32)
        .filter(|&x| x != 0. && x.is_finite())
        .unwrap_or(0.5)
}

/// Parse the text part of the classifier's answer.
///
/// Missing or unknown statuses are an error, so the caller keeps the previous sample. The
/// coordinates are clamped into `[0, 1]`.
pub fn parse_hand_response(text: &str) -> Result<HandSample, ClassifyError> {
    let raw: RawHandResponse = serde_json::from_str(text.trim())?;

    let status = raw.status.ok_or(ClassifyError::MissingStatus)?;
    let state = InteractionState::from_str(status.trim())
        .map_err(|_| ClassifyError::UnknownStatus(status.clone()))?;

    Ok(HandSample::new(
        state,
        coordinate(raw.x.as_ref()),
        coordinate(raw.y.as_ref()),
    ))
}
