//! wgpu rendering for both layers.
//!
//! One surface, one render pass per frame. The particle network is drawn
//! first as the backdrop, the tesseract wireframe on top of it.

mod particles;
mod shaders;
mod wireframe;

use std::sync::Arc;

use glam::{Mat4, Vec4};
use winit::window::Window;

use crate::error::GpuError;
use crate::particles::{ParticleConfig, ParticleField};
use crate::tesseract::{Segment, TesseractConfig};
use particles::ParticleLayer;
use wireframe::WireframeLayer;

/// What to draw this frame. Absent layers are skipped.
pub struct Scene<'a> {
    pub field: Option<&'a ParticleField>,
    pub wireframe: Option<(&'a [Segment], Mat4)>,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    particle_layer: Option<ParticleLayer>,
    wireframe_layer: Option<WireframeLayer>,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(
        window: Arc<Window>,
        particles: Option<&ParticleConfig>,
        tesseract: Option<&TesseractConfig>,
        background: Vec4,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        log::info!("surface format {:?}, {}x{}", surface_format, size.width, size.height);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let particle_layer = particles.map(|c| ParticleLayer::new(&device, c, surface_format));
        let wireframe_layer = tesseract.map(|c| WireframeLayer::new(&device, c.color, surface_format));

        Ok(Self {
            surface,
            device,
            queue,
            config,
            particle_layer,
            wireframe_layer,
            clear_color: wgpu::Color {
                r: background.x as f64,
                g: background.y as f64,
                b: background.z as f64,
                a: background.w as f64,
            },
        })
    }

    /// Reconfigure the surface for a new window size. Zero-sized requests
    /// (minimized windows) are ignored; repeating a size is a no-op.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        if new_size.width == self.config.width && new_size.height == self.config.height {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Reapply the current configuration after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn render(&mut self, scene: &Scene<'_>) -> Result<(), wgpu::SurfaceError> {
        if let (Some(layer), Some(field)) = (&mut self.particle_layer, scene.field) {
            layer.prepare(&self.queue, field);
        }
        if let (Some(layer), Some((segments, view_proj))) = (&mut self.wireframe_layer, scene.wireframe) {
            layer.prepare(&self.queue, segments, view_proj);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if scene.field.is_some() {
                if let Some(layer) = &self.particle_layer {
                    layer.draw(&mut render_pass);
                }
            }
            if scene.wireframe.is_some() {
                if let Some(layer) = &self.wireframe_layer {
                    layer.draw(&mut render_pass);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
