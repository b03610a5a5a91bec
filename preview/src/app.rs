//! Host-facing lifecycle: init, resize, tick, shutdown.

use std::sync::Arc;

use crate::backend::RenderBackend;
use crate::capture::{self, CapturePipeline};
use crate::frame::FrameSlot;
use crate::orient::Rotation;
use crate::present::Presenter;
use crate::rect::Rect;
use crate::{Error, Resolution, sys};

/// A running camera preview bound to one render target.
///
/// The host event loop drives it: construct at startup, call
/// [`Preview::handle_resize`] on window size or orientation changes,
/// [`Preview::tick`] once per display refresh, and drop (or
/// [`Preview::shutdown`]) on quit. The capture side feeds it through the
/// shared [`FrameSlot`] returned by [`Preview::frames`], from any thread.
pub struct Preview<B: RenderBackend> {
    // Declared before the backend so the texture drops first.
    presenter: Presenter<B::Texture>,
    backend: B,
    slot: Arc<FrameSlot>,
    viewport: Rect,
    rotation: Rotation,
}

impl<B: RenderBackend> std::fmt::Debug for Preview<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preview")
            .field("viewport", &self.viewport)
            .field("rotation", &self.rotation)
            .finish_non_exhaustive()
    }
}

impl<B: RenderBackend> Preview<B> {
    /// Initialize against a ready backend, querying the initial viewport
    /// and display rotation.
    ///
    /// # Errors
    /// Propagates backend failures; a startup failure aborts
    /// initialization rather than limping along without output.
    pub fn new(backend: B) -> Result<Self, Error> {
        let mut preview = Self {
            presenter: Presenter::new(),
            backend,
            slot: Arc::new(FrameSlot::new()),
            viewport: Rect::new(0.0, 0.0, 0.0, 0.0),
            rotation: Rotation::Deg0,
        };
        preview.refresh_output()?;
        Ok(preview)
    }

    /// Handle for the frame producer.
    #[must_use]
    pub fn frames(&self) -> Arc<FrameSlot> {
        Arc::clone(&self.slot)
    }

    /// Viewport and rotation used for the next tick.
    #[must_use]
    pub fn output(&self) -> (Rect, Rotation) {
        (self.viewport, self.rotation)
    }

    /// Reconfigure the backend and re-query viewport and display rotation
    /// after a window resize or orientation change.
    ///
    /// # Errors
    /// Propagates backend reconfiguration failures.
    pub fn handle_resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        self.backend.handle_resize(width, height)?;
        self.refresh_output()
    }

    /// Render one frame.
    ///
    /// # Errors
    /// A failure here means a broken output device; the host loop should
    /// exit instead of retrying. The error has already been logged.
    pub fn tick(&mut self) -> Result<(), Error> {
        self.presenter
            .render_tick(&mut self.backend, &self.slot, &self.viewport, self.rotation)
            .inspect_err(|e| log::error!("render tick failed: {e}"))
    }

    /// Request camera permission and, once granted, start `pipeline` into
    /// this preview's frame slot.
    ///
    /// Denied permission is not an error: the pipeline is never started
    /// and ticks keep presenting an empty target.
    ///
    /// # Errors
    /// [`Error::NotSupported`] when the platform has no permission
    /// machinery; platform errors from issuing the request.
    pub fn start_capture<P: CapturePipeline>(
        &self,
        pipeline: P,
        target: Resolution,
    ) -> Result<(), Error> {
        sys::request_camera_permission(capture::start_if_granted(
            pipeline,
            self.frames(),
            target,
        ))
    }

    /// Tear down the preview.
    ///
    /// Dropping has the same effect — field order releases the streaming
    /// texture before the backend's device and surface — this form just
    /// marks the cooperative quit path.
    pub fn shutdown(self) {
        log::info!("preview shut down");
    }

    fn refresh_output(&mut self) -> Result<(), Error> {
        let (width, height) = self.backend.output_size()?;
        self.viewport = Rect::new(0.0, 0.0, width as f32, height as f32);
        self.rotation = self.backend.display_orientation().into();
        log::debug!(
            "output {width}x{height}, rotation {} deg",
            self.rotation.degrees()
        );
        Ok(())
    }
}
