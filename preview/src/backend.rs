//! Seam to the windowing/GPU backend.

use crate::Error;
use crate::orient::{DisplayOrientation, Rotation};
use crate::rect::Rect;

/// Capabilities the presenter needs from a windowing/GPU backend.
///
/// One output frame per tick, produced as: [`RenderBackend::begin_frame`]
/// (clears the target), zero or one [`RenderBackend::draw`], then
/// [`RenderBackend::present`]. Any failure in that sequence is fatal for
/// the tick — a broken graphics context cannot self-heal, so the host
/// loop terminates instead of retrying.
pub trait RenderBackend {
    /// Streaming texture handle.
    type Texture;

    /// Current render-target size in pixels.
    ///
    /// # Errors
    /// [`Error::Backend`] when the target size cannot be queried.
    fn output_size(&self) -> Result<(u32, u32), Error>;

    /// Current physical orientation of the display hosting the target.
    fn display_orientation(&self) -> DisplayOrientation;

    /// Note a change of the window's inner size.
    ///
    /// # Errors
    /// [`Error::Backend`] when the target cannot be reconfigured.
    fn handle_resize(&mut self, width: u32, height: u32) -> Result<(), Error>;

    /// Create a streaming texture for `width`×`height` camera frames.
    ///
    /// # Errors
    /// [`Error::Backend`] when texture creation fails.
    fn create_texture(&mut self, width: u32, height: u32) -> Result<Self::Texture, Error>;

    /// Upload one tightly-packed frame (stride = width) into `texture`.
    ///
    /// # Errors
    /// [`Error::Backend`] on upload failure, [`Error::InvalidFrame`] when
    /// the buffer is too short for the texture's dimensions.
    fn upload(&mut self, texture: &mut Self::Texture, pixels: &[u8]) -> Result<(), Error>;

    /// Start a new output frame, cleared to the background color.
    ///
    /// # Errors
    /// [`Error::Backend`] when the target cannot be acquired or cleared.
    fn begin_frame(&mut self) -> Result<(), Error>;

    /// Draw the full texture into `dest`, rotated clockwise by `rotation`
    /// and vertically flipped.
    ///
    /// `dest` is the on-screen footprint. The flip is unconditional:
    /// camera rows arrive bottom-up relative to the render target.
    ///
    /// # Errors
    /// [`Error::Backend`] on draw failure.
    fn draw(&mut self, texture: &Self::Texture, dest: &Rect, rotation: Rotation)
    -> Result<(), Error>;

    /// Present the finished frame.
    ///
    /// # Errors
    /// [`Error::Backend`] on presentation failure.
    fn present(&mut self) -> Result<(), Error>;
}
