//! Streaming camera preview.
//!
//! This crate bridges a platform-managed camera pipeline and a GPU-backed
//! window: the capture side hands raw YUV frames to a mutex-guarded
//! latest-frame cell from whatever thread the platform delivers them on,
//! and the render loop drains that cell once per display refresh, mirrors
//! it into a streaming texture, and draws the texture with
//! orientation-aware, aspect-preserving placement.
//!
//! Exactly two threads of control touch the crate: the delivery callback
//! (any thread, [`FrameSlot::deliver`]) and the render loop (the thread
//! that owns the GPU context, [`Preview::tick`]). The cell is the only
//! shared state and there is no frame queue — if two frames arrive
//! between ticks, only the latest is ever uploaded.

#![warn(missing_docs)]

mod app;
mod backend;
mod capture;
mod frame;
mod orient;
mod present;
mod rect;
mod sys;

use std::collections::TryReserveError;

/// Re-export wgpu for texture integration.
pub use wgpu;

pub use app::Preview;
pub use backend::RenderBackend;
pub use capture::CapturePipeline;
pub use frame::{FrameSlot, LatestFrame};
pub use orient::{DisplayOrientation, Rotation};
pub use present::Presenter;
pub use rect::{Rect, fit_rect};

/// Re-export the desktop wgpu backend.
#[cfg(any(target_os = "windows", target_os = "linux", target_os = "macos"))]
pub use sys::desktop::{StreamingTexture, WgpuBackend};

/// Errors that can occur in the preview bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A delivered frame was empty or declared a zero dimension.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),
    /// The frame buffer could not grow to hold a delivered frame.
    ///
    /// The previously delivered frame is left intact.
    #[error("frame buffer allocation failed: {0}")]
    Alloc(#[from] TryReserveError),
    /// The windowing/GPU backend reported a failure.
    #[error("render backend error: {0}")]
    Backend(String),
    /// Failed to start the capture pipeline.
    #[error("failed to start capture: {0}")]
    StartFailed(String),
    /// The requested capability is not available on this platform.
    #[error("not supported on this platform")]
    NotSupported,
}

/// Camera resolution configuration.
///
/// Passed to the capture pipeline as a target; the camera may settle on a
/// different size, and the presenter follows the dimensions attached to
/// each delivered frame rather than this request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Standard 720p resolution.
    pub const HD: Self = Self {
        width: 1280,
        height: 720,
    };

    /// Standard 1080p resolution.
    pub const FULL_HD: Self = Self {
        width: 1920,
        height: 1080,
    };
}
