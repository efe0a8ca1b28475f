//! This module handles getting frames from a camera and encoding them for the classifier.

use crate::CaptureError;
use image::{codecs::jpeg::JpegEncoder, imageops, RgbImage};
use tracing::{instrument, trace};

/// Something that can produce video frames.
///
/// Grabbers live entirely inside the signal source thread, so they don't need to be `Send`.
pub trait FrameGrabber {
    /// Grab the latest frame.
    fn grab(&mut self) -> Result<RgbImage, CaptureError>;
}

/// Downsample the frame to `width`×`height` and encode it as a JPEG with the given quality.
#[instrument(skip(frame), fields(source_width = frame.width(), source_height = frame.height()))]
pub fn encode_jpeg(
    frame: &RgbImage,
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, CaptureError> {
    let resized;
    let frame = if frame.dimensions() == (width, height) {
        frame
    } else {
        resized = imageops::resize(frame, width, height, imageops::FilterType::Triangle);
        &resized
    };

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(frame)?;

    trace!(len = bytes.len(), "Encoded frame");
    Ok(bytes)
}

/// A grabber for when there's no camera support compiled in. It always fails to open, so the
/// video never becomes ready.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCamera;

impl NoCamera {
    /// Try to open the camera, which always fails.
    pub fn open() -> Result<Self, CaptureError> {
        Err(CaptureError::Unavailable(
            "camera support was not compiled in; enable the `webcam` feature".to_string(),
        ))
    }
}

impl FrameGrabber for NoCamera {
    fn grab(&mut self) -> Result<RgbImage, CaptureError> {
        Err(CaptureError::Unavailable("no camera".to_string()))
    }
}

#[cfg(feature = "webcam")]
mod webcam {
    use super::*;
    use crate::{CAPTURE_FPS, CAPTURE_HEIGHT, CAPTURE_WIDTH};
    use nokhwa::{
        pixel_format::RgbFormat,
        utils::{
            CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
            Resolution,
        },
        Camera,
    };
    use tracing::{info, warn};

    /// The first camera on the device, streaming low resolution frames at a low frame rate.
    pub struct Webcam {
        camera: Camera,
    }

    impl std::fmt::Debug for Webcam {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("Webcam")
                .field("index", self.camera.index())
                .field("resolution", &self.camera.resolution())
                .finish()
        }
    }

    impl Webcam {
        /// Open the first camera and start streaming.
        #[instrument]
        pub fn open() -> Result<Self, CaptureError> {
            nokhwa::nokhwa_initialize(|_| {});

            let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
                CameraFormat::new(
                    Resolution::new(CAPTURE_WIDTH, CAPTURE_HEIGHT),
                    FrameFormat::MJPEG,
                    CAPTURE_FPS,
                ),
            ));

            let mut camera = Camera::new(CameraIndex::Index(0), format)
                .map_err(|error| CaptureError::Unavailable(error.to_string()))?;
            camera
                .open_stream()
                .map_err(|error| CaptureError::Unavailable(error.to_string()))?;

            info!(resolution = ?camera.resolution(), fps = camera.frame_rate(), "Opened camera");
            Ok(Self { camera })
        }
    }

    impl FrameGrabber for Webcam {
        fn grab(&mut self) -> Result<RgbImage, CaptureError> {
            let frame = self
                .camera
                .frame()
                .map_err(|error| CaptureError::Frame(error.to_string()))?;
            let decoded = frame
                .decode_image::<RgbFormat>()
                .map_err(|error| CaptureError::Frame(error.to_string()))?;

            let (width, height) = decoded.dimensions();
            RgbImage::from_raw(width, height, decoded.into_raw())
                .ok_or_else(|| CaptureError::Frame("frame buffer was too small".to_string()))
        }
    }

    impl Drop for Webcam {
        fn drop(&mut self) {
            if let Err(error) = self.camera.stop_stream() {
                warn!(?error, "Unable to stop camera stream");
            }
        }
    }
}

#[cfg(feature = "webcam")]
pub use self::webcam::Webcam;
