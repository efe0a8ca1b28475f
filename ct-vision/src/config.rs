//! This module handles the environment variables and constants used by the signal source.

use crate::ConfigError;
use std::{fmt, sync::OnceLock, time::Duration};

/// The time between classification ticks.
pub const CLASSIFY_INTERVAL: Duration = Duration::from_millis(200);

/// The width of the frame sent to the classifier.
pub const CAPTURE_WIDTH: u32 = 320;

/// The height of the frame sent to the classifier.
pub const CAPTURE_HEIGHT: u32 = 240;

/// The frame rate requested from the camera.
pub const CAPTURE_FPS: u32 = 15;

/// The JPEG quality of the frame sent to the classifier, out of 100.
pub const JPEG_QUALITY: u8 = 60;

/// The model used when `CHAOS_TREE_MODEL` isn't set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// The instruction sent along with every frame.
pub const HAND_PROMPT: &str = "Analyze the hand in this image. \
    1. If palm is open/fingers spread, status is 'CHAOS'. \
    2. If fist/closed/no hand, status is 'FORMED'. \
    3. Detect hand center position X and Y (0 to 1). \
    Return JSON.";

/// A [`OnceLock`] to cache the model name.
static MODEL_NAME_CELL: OnceLock<String> = OnceLock::new();

/// The name of the classifier model, from the `CHAOS_TREE_MODEL` environment variable or
/// [`DEFAULT_MODEL`].
pub fn model_name() -> &'static str {
    MODEL_NAME_CELL.get_or_init(|| {
        std::env::var("CHAOS_TREE_MODEL")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    })
}

/// A non-empty API key for the classifier.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

impl ApiKey {
    /// Read the key from the `API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_value(std::env::var("API_KEY").ok())
    }

    /// Validate a key which might be missing. Empty and whitespace-only keys count as missing.
    pub fn from_value(value: Option<String>) -> Result<Self, ConfigError> {
        match value {
            Some(key) if !key.trim().is_empty() => Ok(Self(key.trim().to_string())),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    /// The key itself.
    pub fn expose(&self) -> &str {
        &self.0
    }
}
