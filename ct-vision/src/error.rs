//! This module provides the error types for the signal source.

use ct_geometry::InvalidSceneConfig;
use thiserror::Error;

/// A problem with the process configuration. Nothing is started when one of these happens.
#[derive(Clone, Debug, Error, PartialEq)]
#[allow(missing_docs, reason = "the #[error] attributes document the variants")]
pub enum ConfigError {
    #[error("ERROR: API_KEY is missing from environment.")]
    MissingApiKey,

    #[error("Invalid scene config: {0}")]
    InvalidScene(#[from] InvalidSceneConfig),
}

/// A problem getting a frame from the camera.
#[derive(Debug, Error)]
#[allow(missing_docs, reason = "the #[error] attributes document the variants")]
pub enum CaptureError {
    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    #[error("Unable to grab frame: {0}")]
    Frame(String),

    #[error("Unable to encode frame: {0}")]
    Encode(#[from] image::ImageError),
}

/// A problem asking the classifier about a frame. The previous sample is kept when one of these
/// happens.
#[derive(Debug, Error)]
#[allow(missing_docs, reason = "the #[error] attributes document the variants")]
pub enum ClassifyError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Classifier returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Classifier returned no text")]
    EmptyResponse,

    #[error("Unable to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Classifier response had no status")]
    MissingStatus,

    #[error("Unknown status {0:?}")]
    UnknownStatus(String),
}
