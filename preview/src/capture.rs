//! Seam to the platform capture pipeline.

use std::sync::Arc;

use crate::frame::FrameSlot;
use crate::{Error, Resolution};

/// A source of camera frames.
///
/// Implementations wrap the platform's capture machinery — a camera
/// session, a decoder, or a synthetic generator in tests — and call
/// [`FrameSlot::deliver`] from their own thread at whatever cadence the
/// source produces. The pipeline is fire-and-forget: once started it owns
/// its thread and its shutdown.
pub trait CapturePipeline: Send + 'static {
    /// Begin delivering frames into `slot`, aiming for `target`.
    ///
    /// The camera may settle on a different size; the presenter follows
    /// the dimensions attached to each delivery, not this request.
    ///
    /// # Errors
    /// [`Error::StartFailed`] when the source cannot be started.
    fn start(self, slot: Arc<FrameSlot>, target: Resolution) -> Result<(), Error>;
}

/// Permission-gated pipeline start: the callback handed to the platform's
/// permission request. Denied means the pipeline is never started and the
/// render loop keeps running, drawing nothing.
pub(crate) fn start_if_granted<P: CapturePipeline>(
    pipeline: P,
    slot: Arc<FrameSlot>,
    target: Resolution,
) -> impl FnOnce(bool) + Send + 'static {
    move |granted| {
        if granted {
            if let Err(e) = pipeline.start(slot, target) {
                log::error!("capture pipeline failed to start: {e}");
            }
        } else {
            log::warn!("camera permission denied; preview stays blank");
        }
    }
}
