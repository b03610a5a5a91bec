//! Desktop render backend (wgpu) and permission glue.

use crate::Error;
use crate::backend::RenderBackend;
use crate::orient::{DisplayOrientation, Rotation};
use crate::rect::Rect;

/// Request camera access.
///
/// Desktop builds have no runtime permission gate of their own — the
/// capture device either opens or it does not — so the callback is
/// invoked immediately with `granted = true`.
///
/// # Errors
/// None on desktop; the signature matches the mobile glue.
pub fn request_camera_permission<F>(on_result: F) -> Result<(), Error>
where
    F: FnOnce(bool) + Send + 'static,
{
    log::debug!("camera permission implicitly granted on desktop");
    on_result(true);
    Ok(())
}

fn backend_err(context: &str, e: &dyn std::fmt::Display) -> Error {
    log::error!("{context}: {e}");
    Error::Backend(format!("{context}: {e}"))
}

/// Uniform placing the textured quad: a 2x2 column-major rotation/scale
/// into NDC plus a translation, padded to vec4 alignment.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct QuadTransform {
    col0: [f32; 4],
    col1: [f32; 4],
    offset: [f32; 4],
}

/// Streaming camera texture.
///
/// Holds the GPU texture, its bind group, and the staging buffer for the
/// NV12 to RGBA conversion, reused across uploads.
pub struct StreamingTexture {
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl std::fmt::Debug for StreamingTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingTexture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// One output frame being recorded between `begin_frame` and `present`.
#[derive(Debug)]
struct FrameInFlight {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

/// wgpu implementation of [`RenderBackend`] over any window surface.
#[derive(Debug)]
pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    transform: wgpu::Buffer,
    frame: Option<FrameInFlight>,
}

impl WgpuBackend {
    /// Create a backend rendering to `target` (for example an
    /// `Arc<winit::window::Window>`) with the window's current inner
    /// size.
    ///
    /// # Errors
    /// [`Error::Backend`] on any wgpu setup failure; fatal at startup.
    pub async fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, Error> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance
            .create_surface(target)
            .map_err(|e| backend_err("create surface", &e))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(|e| backend_err("request adapter", &e))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .map_err(|e| backend_err("request device", &e))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .first()
            .copied()
            .ok_or_else(|| backend_err("surface capabilities", &"no supported formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .ok_or_else(|| backend_err("surface capabilities", &"no supported alpha modes"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("video_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            size_of::<QuadTransform>() as u64
                        ),
                    },
                    count: None,
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("video_quad_shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("video_quad_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("video_quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let transform = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad_transform"),
            size: size_of::<QuadTransform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group_layout,
            sampler,
            transform,
            frame: None,
        })
    }
}

impl RenderBackend for WgpuBackend {
    type Texture = StreamingTexture;

    fn output_size(&self) -> Result<(u32, u32), Error> {
        Ok((self.config.width, self.config.height))
    }

    fn display_orientation(&self) -> DisplayOrientation {
        // Desktop monitors report no flipped states; infer from the
        // render target's shape.
        if self.config.height > self.config.width {
            DisplayOrientation::Portrait
        } else {
            DisplayOrientation::Landscape
        }
    }

    fn handle_resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            // Minimized; keep the previous configuration.
            return Ok(());
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        Ok(())
    }

    fn create_texture(&mut self, width: u32, height: u32) -> Result<StreamingTexture, Error> {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("camera_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("video_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.transform.as_entire_binding(),
                },
            ],
        });

        Ok(StreamingTexture {
            texture,
            bind_group,
            width,
            height,
            rgba: Vec::new(),
        })
    }

    fn upload(&mut self, texture: &mut StreamingTexture, pixels: &[u8]) -> Result<(), Error> {
        nv12_to_rgba(pixels, texture.width, texture.height, &mut texture.rgba)?;

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texture.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(texture.width * 4),
                rows_per_image: Some(texture.height),
            },
            wgpu::Extent3d {
                width: texture.width,
                height: texture.height,
                depth_or_array_layers: 1,
            },
        );

        Ok(())
    }

    fn begin_frame(&mut self) -> Result<(), Error> {
        let surface_texture = self
            .surface
            .get_current_texture()
            .map_err(|e| backend_err("acquire surface texture", &e))?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

        // Clear in its own pass so an empty tick still presents black.
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        self.frame = Some(FrameInFlight {
            surface_texture,
            view,
            encoder,
        });
        Ok(())
    }

    fn draw(
        &mut self,
        texture: &StreamingTexture,
        dest: &Rect,
        rotation: Rotation,
    ) -> Result<(), Error> {
        let frame = self
            .frame
            .as_mut()
            .ok_or_else(|| backend_err("draw", &"no frame in flight"))?;

        // `dest` is the on-screen footprint; the quad itself spans the
        // pre-rotation rectangle, so quarter turns transpose back.
        let (quad_w, quad_h) = if rotation.is_quarter_turn() {
            (dest.h, dest.w)
        } else {
            (dest.w, dest.h)
        };
        let (sin, cos) = rotation.degrees().to_radians().sin_cos();
        let out_w = self.config.width as f32;
        let out_h = self.config.height as f32;
        let (cx, cy) = dest.center();
        let transform = QuadTransform {
            col0: [
                2.0 * quad_w * cos / out_w,
                -2.0 * quad_w * sin / out_h,
                0.0,
                0.0,
            ],
            col1: [
                -2.0 * quad_h * sin / out_w,
                -2.0 * quad_h * cos / out_h,
                0.0,
                0.0,
            ],
            offset: [2.0 * cx / out_w - 1.0, 1.0 - 2.0 * cy / out_h, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.transform, 0, bytemuck::bytes_of(&transform));

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("video_quad_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &texture.bind_group, &[]);
        pass.draw(0..6, 0..1);
        drop(pass);
        Ok(())
    }

    fn present(&mut self) -> Result<(), Error> {
        let frame = self
            .frame
            .take()
            .ok_or_else(|| backend_err("present", &"no frame in flight"))?;
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.surface_texture.present();
        Ok(())
    }
}

/// Expand one NV12 frame into tightly-packed RGBA (BT.601 limited range).
///
/// `out` is reused across calls; it is cleared and refilled.
fn nv12_to_rgba(pixels: &[u8], width: u32, height: u32, out: &mut Vec<u8>) -> Result<(), Error> {
    if width % 2 != 0 || height % 2 != 0 {
        return Err(Error::InvalidFrame(format!(
            "NV12 requires even dimensions, got {width}x{height}"
        )));
    }
    let w = width as usize;
    let h = height as usize;
    let y_size = w * h;
    let needed = y_size + y_size / 2;
    if pixels.len() < needed {
        return Err(Error::InvalidFrame(format!(
            "NV12 {width}x{height} needs {needed} bytes, got {}",
            pixels.len()
        )));
    }

    out.clear();
    out.try_reserve(y_size * 4)?;
    out.resize(y_size * 4, 0);

    for row in 0..h {
        let uv_row = y_size + (row / 2) * w;
        for col in 0..w {
            let y = i32::from(pixels[row * w + col]);
            let uv = uv_row + (col & !1);
            let u = i32::from(pixels[uv]) - 128;
            let v = i32::from(pixels[uv + 1]) - 128;

            let c = (y - 16).max(0) * 298;
            let r = (c + 409 * v + 128) >> 8;
            let g = (c - 100 * u - 208 * v + 128) >> 8;
            let b = (c + 516 * u + 128) >> 8;

            let px = (row * w + col) * 4;
            out[px] = r.clamp(0, 255) as u8;
            out[px + 1] = g.clamp(0, 255) as u8;
            out[px + 2] = b.clamp(0, 255) as u8;
            out[px + 3] = 255;
        }
    }
    Ok(())
}

const SHADER: &str = r#"
struct Transform {
    col0: vec4<f32>,
    col1: vec4<f32>,
    offset: vec4<f32>,
}

@group(0) @binding(0) var t_video: texture_2d<f32>;
@group(0) @binding(1) var s_video: sampler;
@group(0) @binding(2) var<uniform> quad: Transform;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    // Unit quad, y down; the uniform carries rotation, scale, and the
    // pixel-to-NDC mapping.
    var corners = array<vec2<f32>, 6>(
        vec2(-0.5, -0.5),
        vec2( 0.5, -0.5),
        vec2(-0.5,  0.5),
        vec2(-0.5,  0.5),
        vec2( 0.5, -0.5),
        vec2( 0.5,  0.5),
    );

    let p = corners[idx];
    var out: VertexOutput;
    out.position = vec4(quad.col0.xy * p.x + quad.col1.xy * p.y + quad.offset.xy, 0.0, 1.0);
    // Fixed vertical flip: camera rows arrive bottom-up.
    out.uv = vec2(p.x + 0.5, 0.5 - p.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(t_video, s_video, in.uv);
}
"#;
