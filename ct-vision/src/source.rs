//! This module runs the signal source: a fixed-interval loop that captures, classifies, and
//! publishes hand samples in a background thread.

use crate::{
    encode_jpeg, ApiKey, CaptureError, Classifier, ConfigError, FrameGrabber, CAPTURE_HEIGHT,
    CAPTURE_WIDTH, CLASSIFY_INTERVAL, JPEG_QUALITY,
};
use ct_hand::{BusyFlag, HandCell, WeakHandCell};
use std::{
    future::Future,
    rc::Rc,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
    time::Duration,
};
use tokio::{sync::oneshot, time::MissedTickBehavior};
use tracing::{debug, info, instrument, trace, warn};
use tracing_unwrap::ResultExt;

/// What happened to one classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The sample was written to the shared cell.
    Published,

    /// The classifier failed or gave a bad answer, so the previous sample was kept.
    Discarded,

    /// The classification finished after the surface had gone away.
    SurfaceGone,
}

/// Status of the signal source that the surface can show.
#[derive(Debug, Default)]
pub struct VisionStatus {
    video_ready: AtomicBool,
    busy: BusyFlag,
}

impl VisionStatus {
    /// Has the camera been opened?
    pub fn is_video_ready(&self) -> bool {
        self.video_ready.load(Ordering::Acquire)
    }

    /// Is a classification in flight?
    pub fn is_thinking(&self) -> bool {
        self.busy.is_busy()
    }

    /// The flag used to make sure only one classification is in flight.
    pub fn busy_flag(&self) -> &BusyFlag {
        &self.busy
    }

    fn set_video_ready(&self, ready: bool) {
        self.video_ready.store(ready, Ordering::Release);
    }
}

/// Classify one frame and publish the result if the surface is still around.
#[instrument(skip_all)]
pub async fn classify_and_publish<C: Classifier + ?Sized>(
    classifier: &C,
    jpeg: &[u8],
    cell: &WeakHandCell,
) -> TickOutcome {
    match classifier.classify(jpeg).await {
        Ok(sample) => {
            if cell.publish_if_alive(sample) {
                trace!(?sample, "Published hand sample");
                TickOutcome::Published
            } else {
                debug!("Surface is gone; discarding late classification");
                TickOutcome::SurfaceGone
            }
        }
        Err(error) => {
            warn!(%error, "Classification failed; keeping previous sample");
            TickOutcome::Discarded
        }
    }
}

/// Grab a frame and encode it for the classifier.
fn capture<G: FrameGrabber + ?Sized>(grabber: &mut G) -> Result<Vec<u8>, CaptureError> {
    let frame = grabber.grab()?;
    encode_jpeg(&frame, CAPTURE_WIDTH, CAPTURE_HEIGHT, JPEG_QUALITY)
}

/// Run the capture and classify loop until `shutdown` resolves.
///
/// Every `interval`, if no classification is in flight, this grabs a frame and spawns a local
/// task to classify it. Ticks that arrive while the busy flag is held are dropped. This must be
/// run inside a [`tokio::task::LocalSet`].
#[instrument(skip_all, fields(interval = ?interval))]
pub async fn run_signal_loop<C, G, S>(
    classifier: Rc<C>,
    mut grabber: G,
    cell: WeakHandCell,
    busy: BusyFlag,
    interval: Duration,
    shutdown: S,
) where
    C: Classifier + ?Sized + 'static,
    G: FrameGrabber,
    S: Future,
{
    let mut ticks = tokio::time::interval(interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    info!("Beginning signal source loop");

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutting down signal source loop");
                break;
            }

            _ = ticks.tick() => {
                let Some(guard) = busy.try_acquire() else {
                    trace!("Classification still in flight; dropping tick");
                    continue;
                };

                if cell.upgrade().is_none() {
                    debug!("Surface is gone; stopping signal source loop");
                    break;
                }

                let jpeg = match capture(&mut grabber) {
                    Ok(jpeg) => jpeg,
                    Err(error) => {
                        warn!(%error, "Unable to capture frame");
                        continue;
                    }
                };

                let classifier = Rc::clone(&classifier);
                let cell = cell.clone();
                tokio::task::spawn_local(async move {
                    classify_and_publish(&*classifier, &jpeg, &cell).await;
                    drop(guard);
                });
            }
        }
    }
}

/// The handle to a running signal source. Dropping it stops the background thread and releases
/// the camera.
#[derive(Debug)]
pub struct SignalSourceHandle {
    status: Arc<VisionStatus>,
    kill_thread: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl SignalSourceHandle {
    /// The status of the signal source.
    pub fn status(&self) -> &Arc<VisionStatus> {
        &self.status
    }
}

impl Drop for SignalSourceHandle {
    fn drop(&mut self) {
        if let Some(kill_thread) = self.kill_thread.take() {
            let _ = kill_thread.send(());
        }

        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Signal source thread panicked");
            }
        }
    }
}

/// Start the signal source in a background thread.
///
/// A missing or empty API key is an error and nothing is started, so no frames are captured and
/// no requests are made. Otherwise `make_classifier` and `open_grabber` are called on the
/// background thread. If the grabber fails to open, the video is never ready and the thread just
/// waits to be shut down.
pub fn launch<C, G, MC, OG>(
    api_key: Option<String>,
    cell: &HandCell,
    make_classifier: MC,
    open_grabber: OG,
) -> Result<SignalSourceHandle, ConfigError>
where
    C: Classifier + 'static,
    G: FrameGrabber + 'static,
    MC: FnOnce(ApiKey) -> C + Send + 'static,
    OG: FnOnce() -> Result<G, CaptureError> + Send + 'static,
{
    let api_key = ApiKey::from_value(api_key)?;

    let status = Arc::new(VisionStatus::default());
    let (kill_tx, kill_rx) = oneshot::channel();
    let weak_cell = cell.downgrade();

    let thread = {
        let status = Arc::clone(&status);
        std::thread::spawn(move || {
            run_signal_source(
                api_key,
                weak_cell,
                status,
                make_classifier,
                open_grabber,
                kill_rx,
            )
        })
    };

    Ok(SignalSourceHandle {
        status,
        kill_thread: Some(kill_tx),
        thread: Some(thread),
    })
}

/// The body of the signal source thread.
#[instrument(skip_all)]
fn run_signal_source<C, G, MC, OG>(
    api_key: ApiKey,
    cell: WeakHandCell,
    status: Arc<VisionStatus>,
    make_classifier: MC,
    open_grabber: OG,
    kill_thread: oneshot::Receiver<()>,
) where
    C: Classifier + 'static,
    G: FrameGrabber,
    MC: FnOnce(ApiKey) -> C,
    OG: FnOnce() -> Result<G, CaptureError>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_log();
    let local = tokio::task::LocalSet::new();

    let grabber = match open_grabber() {
        Ok(grabber) => {
            status.set_video_ready(true);
            grabber
        }
        Err(error) => {
            warn!(%error, "Unable to open camera; video will never be ready");
            local.block_on(&runtime, async move {
                let _ = kill_thread.await;
            });
            return;
        }
    };

    let classifier = Rc::new(make_classifier(api_key));
    let busy = status.busy_flag().clone();

    local.block_on(
        &runtime,
        run_signal_loop(
            classifier,
            grabber,
            cell,
            busy,
            CLASSIFY_INTERVAL,
            kill_thread,
        ),
    );

    status.set_video_ready(false);
}
