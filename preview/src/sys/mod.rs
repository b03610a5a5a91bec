//! Platform-specific implementations.

#[cfg(any(target_os = "windows", target_os = "linux", target_os = "macos"))]
pub mod desktop;

#[cfg(any(target_os = "windows", target_os = "linux", target_os = "macos"))]
pub(crate) use desktop::request_camera_permission;

// Fallback for platforms without a bundled backend: hosts there bring
// their own `RenderBackend` and permission glue.
#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
mod fallback {
    use crate::Error;

    pub fn request_camera_permission<F>(_on_result: F) -> Result<(), Error>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        Err(Error::NotSupported)
    }
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
pub(crate) use fallback::request_camera_permission;
