//! This crate turns webcam frames into [`HandSample`](ct_hand::HandSample)s.
//!
//! A background thread runs its own `tokio` runtime. On every tick of a fixed interval, it grabs a
//! frame from a [`FrameGrabber`], encodes it as a small JPEG, and asks a [`Classifier`] what the
//! hand is doing. Only one classification is ever in flight, and ticks that arrive while one is
//! running are dropped.

mod capture;
mod classifier;
mod config;
mod error;
mod response;
mod source;

pub use self::{
    capture::{encode_jpeg, FrameGrabber, NoCamera},
    classifier::{request_body, response_text, Classifier, GeminiClassifier},
    config::{
        model_name, ApiKey, CAPTURE_FPS, CAPTURE_HEIGHT, CAPTURE_WIDTH, CLASSIFY_INTERVAL,
        DEFAULT_MODEL, HAND_PROMPT, JPEG_QUALITY,
    },
    error::{CaptureError, ClassifyError, ConfigError},
    response::parse_hand_response,
    source::{
        classify_and_publish, launch, run_signal_loop, SignalSourceHandle, TickOutcome,
        VisionStatus,
    },
};

#[cfg(feature = "webcam")]
pub use self::capture::Webcam;
