//! The shared latest-frame cell between the capture callback and the
//! render loop.

use std::sync::{Mutex, MutexGuard};

use crate::Error;

/// Single-slot hand-off for the most recently delivered camera frame.
///
/// The capture pipeline writes with [`FrameSlot::deliver`] at whatever
/// cadence the camera runs; the render loop drains with
/// [`FrameSlot::lock`] once per tick. There is no queue and no
/// backpressure: two deliveries between ticks keep only the second, a
/// deliberate drop-oldest policy for a live preview.
///
/// Pixel storage only ever grows, so once the frame size reaches steady
/// state no delivery allocates.
#[derive(Debug, Default)]
pub struct FrameSlot {
    inner: Mutex<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    dirty: bool,
}

impl FrameSlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest camera frame.
    ///
    /// Callable from any thread. Copies `bytes` into the slot's own
    /// storage, records the declared dimensions, and marks the slot dirty
    /// for the next render tick.
    ///
    /// # Errors
    /// [`Error::InvalidFrame`] for an empty buffer or a zero dimension,
    /// [`Error::Alloc`] when storage cannot grow. Either way the
    /// previously delivered frame is left intact and this delivery is
    /// dropped whole — never partially applied.
    pub fn deliver(&self, bytes: &[u8], width: u32, height: u32) -> Result<(), Error> {
        if bytes.is_empty() || width == 0 || height == 0 {
            return Err(Error::InvalidFrame(format!(
                "{width}x{height}, {} bytes",
                bytes.len()
            )));
        }

        let mut shared = self.inner.lock().unwrap();
        if bytes.len() > shared.pixels.capacity() {
            // Build the replacement before discarding the old buffer so a
            // failed allocation leaves the previous frame untouched.
            let mut grown = Vec::new();
            grown.try_reserve_exact(bytes.len())?;
            shared.pixels = grown;
        }
        shared.pixels.clear();
        shared.pixels.extend_from_slice(bytes);
        shared.width = width;
        shared.height = height;
        shared.dirty = true;
        Ok(())
    }

    /// Lock the slot for one consume by the render loop.
    ///
    /// Never blocks waiting for a new frame: if nothing arrived since the
    /// last tick the guard simply reports clean and the caller redraws the
    /// previous texture. The guard must not be held across a draw or
    /// present call.
    pub fn lock(&self) -> LatestFrame<'_> {
        LatestFrame {
            guard: self.inner.lock().unwrap(),
        }
    }

    /// Byte capacity currently reserved for pixel storage.
    ///
    /// Monotonically non-decreasing across deliveries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().unwrap().pixels.capacity()
    }
}

/// Exclusive view of the most recent frame.
///
/// Held for the minimal critical section of a render tick: dimension
/// check, texture upload, [`LatestFrame::mark_clean`].
#[derive(Debug)]
pub struct LatestFrame<'a> {
    guard: MutexGuard<'a, Shared>,
}

impl LatestFrame<'_> {
    /// Dimensions of the most recently delivered frame.
    ///
    /// `(0, 0)` before the first delivery.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.guard.width, self.guard.height)
    }

    /// Raw pixel bytes of the latest frame.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.guard.pixels
    }

    /// Whether the pixel data has not yet been uploaded to the texture.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.guard.dirty
    }

    /// Mark the current pixel data as uploaded.
    pub fn mark_clean(&mut self) {
        self.guard.dirty = false;
    }
}
