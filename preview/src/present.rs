//! Per-tick texture maintenance and drawing.

use crate::Error;
use crate::backend::RenderBackend;
use crate::frame::FrameSlot;
use crate::orient::Rotation;
use crate::rect::{Rect, fit_rect};

/// Streaming texture plus the dimensions it was created with.
///
/// The recorded dimensions never trail the handle: the pair is replaced
/// atomically on recreation, so a partially updated texture is
/// unrepresentable.
#[derive(Debug)]
struct StreamTexture<T> {
    handle: T,
    width: u32,
    height: u32,
    /// Source aspect as height / width; recomputed on recreation.
    video_ratio: f32,
}

/// Draws the latest camera frame each tick.
///
/// Owns the GPU texture mirroring the frame slot and recreates it lazily
/// whenever the delivered frame dimensions change — a resize event, not
/// an error. Generic over the backend's texture handle so the tick logic
/// is testable without a GPU.
pub struct Presenter<T> {
    texture: Option<StreamTexture<T>>,
}

impl<T> std::fmt::Debug for Presenter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Presenter");
        match &self.texture {
            Some(t) => s
                .field("texture", &format_args!("{}x{}", t.width, t.height))
                .finish(),
            None => s.field("texture", &None::<()>).finish(),
        }
    }
}

impl<T> Default for Presenter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Presenter<T> {
    /// Presenter with no texture yet; one is created on the first tick
    /// after a frame arrives.
    #[must_use]
    pub const fn new() -> Self {
        Self { texture: None }
    }

    /// Render one frame: clear, consume the latest delivery, draw the
    /// texture fitted to `viewport` under `rotation`, present.
    ///
    /// Redrawing with no new delivery is idempotent — no recreation, no
    /// re-upload, the previous texture is drawn unchanged.
    ///
    /// # Errors
    /// Any backend failure. Fatal for the tick; the host loop should
    /// terminate rather than retry on a broken output device.
    pub fn render_tick<B>(
        &mut self,
        backend: &mut B,
        slot: &FrameSlot,
        viewport: &Rect,
        rotation: Rotation,
    ) -> Result<(), Error>
    where
        B: RenderBackend<Texture = T>,
    {
        backend.begin_frame()?;
        self.consume(backend, slot)?;
        if let Some(texture) = &self.texture {
            if let Some(dest) = fit_rect(viewport, rotation, texture.video_ratio) {
                backend.draw(&texture.handle, &dest, rotation)?;
            }
        }
        backend.present()
    }

    /// Texture maintenance under the slot lock: recreate on dimension
    /// change, upload when dirty. The lock covers exactly this step,
    /// never the draw or present.
    fn consume<B>(&mut self, backend: &mut B, slot: &FrameSlot) -> Result<(), Error>
    where
        B: RenderBackend<Texture = T>,
    {
        let mut frame = slot.lock();
        let (width, height) = frame.size();
        if width == 0 || height == 0 {
            // Nothing delivered yet.
            return Ok(());
        }

        let stale = self
            .texture
            .as_ref()
            .is_none_or(|t| t.width != width || t.height != height);
        if stale {
            // Drop the old texture before creating its replacement.
            self.texture = None;
            let handle = backend.create_texture(width, height)?;
            self.texture = Some(StreamTexture {
                handle,
                width,
                height,
                video_ratio: height as f32 / width as f32,
            });
            log::debug!("stream texture recreated at {width}x{height}");
        }

        if frame.is_dirty() {
            if let Some(texture) = &mut self.texture {
                backend.upload(&mut texture.handle, frame.pixels())?;
                frame.mark_clean();
            }
        }
        Ok(())
    }
}
