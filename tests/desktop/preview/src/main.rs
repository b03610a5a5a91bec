//! Camera preview harness using winit + wgpu.
//!
//! Stands in for a platform capture pipeline with a worker thread that
//! delivers a moving NV12 test pattern, and drives the preview's
//! lifecycle from a winit event loop: resize events re-query the
//! viewport and rotation, every redraw is one render tick, and a fatal
//! tick error exits the loop.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use glint_preview::{CapturePipeline, Error, FrameSlot, Preview, Resolution, WgpuBackend};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

fn main() {
    env_logger::init();
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        window: None,
        preview: None,
        stop: Arc::new(AtomicBool::new(false)),
    };
    event_loop.run_app(&mut app).unwrap();
    app.stop.store(true, Ordering::Relaxed);
}

struct App {
    window: Option<Arc<Window>>,
    preview: Option<Preview<WgpuBackend>>,
    stop: Arc<AtomicBool>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.preview.is_some() {
            return;
        }

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("glint preview")
                        .with_inner_size(winit::dpi::LogicalSize::new(960, 540)),
                )
                .unwrap(),
        );

        let size = window.inner_size();
        let backend =
            match pollster::block_on(WgpuBackend::new(window.clone(), size.width, size.height)) {
                Ok(backend) => backend,
                Err(e) => {
                    log::error!("backend init failed: {e}");
                    event_loop.exit();
                    return;
                }
            };

        let preview = match Preview::new(backend) {
            Ok(preview) => preview,
            Err(e) => {
                log::error!("preview init failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let camera = SyntheticCamera {
            stop: Arc::clone(&self.stop),
        };
        if let Err(e) = preview.start_capture(camera, Resolution {
            width: 640,
            height: 360,
        }) {
            log::error!("capture start failed: {e}");
        }

        window.request_redraw();
        self.window = Some(window);
        self.preview = Some(preview);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.stop.store(true, Ordering::Relaxed);
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && event.logical_key == Key::Named(NamedKey::Escape) {
                    self.stop.store(true, Ordering::Relaxed);
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(preview) = &mut self.preview {
                    if let Err(e) = preview.handle_resize(size.width, size.height) {
                        log::error!("resize failed: {e}");
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(preview) = &mut self.preview {
                    if let Err(e) = preview.tick() {
                        log::error!("exiting after fatal render error: {e}");
                        event_loop.exit();
                        return;
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Stand-in for the platform camera: delivers a moving NV12 gradient at
/// roughly 30 fps until told to stop.
struct SyntheticCamera {
    stop: Arc<AtomicBool>,
}

impl CapturePipeline for SyntheticCamera {
    fn start(self, slot: Arc<FrameSlot>, target: Resolution) -> Result<(), Error> {
        thread::spawn(move || {
            let (width, height) = (target.width, target.height);
            let mut frame = vec![0u8; (width * height + width * height / 2) as usize];
            let mut t: u32 = 0;
            while !self.stop.load(Ordering::Relaxed) {
                fill_nv12(&mut frame, width, height, t);
                if let Err(e) = slot.deliver(&frame, width, height) {
                    log::error!("frame delivery failed: {e}");
                    break;
                }
                t = t.wrapping_add(1);
                thread::sleep(Duration::from_millis(33));
            }
            log::info!("synthetic camera stopped");
        });
        Ok(())
    }
}

/// Diagonal luma gradient scrolling over time, with a slow chroma cycle.
fn fill_nv12(frame: &mut [u8], width: u32, height: u32, t: u32) {
    let w = width as usize;
    let h = height as usize;
    let (luma, chroma) = frame.split_at_mut(w * h);

    for row in 0..h {
        for col in 0..w {
            luma[row * w + col] = ((col + row + t as usize) % 220 + 16) as u8;
        }
    }
    for (i, uv) in chroma.chunks_exact_mut(2).enumerate() {
        uv[0] = ((i / w + t as usize / 4) % 128 + 64) as u8;
        uv[1] = ((i % w + t as usize / 2) % 128 + 64) as u8;
    }
}
