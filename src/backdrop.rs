//! Backdrop builder and runner

use std::sync::Arc;

use glam::Vec4;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::BackdropError;
use crate::gpu::{GpuState, Scene};
use crate::particles::{ParticleConfig, ParticleField, Viewport};
use crate::tesseract::{TesseractConfig, TesseractView};
use crate::time::FrameClock;

/// Window running the particle network and/or the tesseract.
///
/// Use method chaining to configure, then call `.run()` to start.
#[derive(Debug, Clone)]
pub struct Backdrop {
    title: String,
    window_size: (u32, u32),
    background: Vec4,
    particles: Option<ParticleConfig>,
    tesseract: Option<TesseractConfig>,
}

impl Backdrop {
    /// Both layers with default settings.
    pub fn new() -> Self {
        Self {
            title: "hyperfield".to_string(),
            window_size: (1280, 720),
            background: Vec4::new(0.02, 0.02, 0.05, 1.0),
            particles: Some(ParticleConfig::default()),
            tesseract: Some(TesseractConfig::default()),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Clear color (RGBA, 0.0-1.0).
    pub fn with_background(mut self, color: Vec4) -> Self {
        self.background = color;
        self
    }

    pub fn with_particles(mut self, config: ParticleConfig) -> Self {
        self.particles = Some(config);
        self
    }

    pub fn without_particles(mut self) -> Self {
        self.particles = None;
        self
    }

    pub fn with_tesseract(mut self, config: TesseractConfig) -> Self {
        self.tesseract = Some(config);
        self
    }

    pub fn without_tesseract(mut self) -> Self {
        self.tesseract = None;
        self
    }

    pub fn particles(&self) -> Option<&ParticleConfig> {
        self.particles.as_ref()
    }

    pub fn tesseract(&self) -> Option<&TesseractConfig> {
        self.tesseract.as_ref()
    }

    /// Check the whole configuration without opening a window.
    pub fn validate(&self) -> Result<(), BackdropError> {
        if self.particles.is_none() && self.tesseract.is_none() {
            return Err(BackdropError::InvalidConfig(
                "at least one layer must be enabled".to_string(),
            ));
        }
        if self.window_size.0 == 0 || self.window_size.1 == 0 {
            return Err(BackdropError::InvalidConfig(format!(
                "window size must be non-zero, got {}x{}",
                self.window_size.0, self.window_size.1
            )));
        }
        if let Some(config) = &self.particles {
            config.validate().map_err(BackdropError::InvalidConfig)?;
        }
        if let Some(config) = &self.tesseract {
            config.validate().map_err(BackdropError::InvalidConfig)?;
        }
        Ok(())
    }

    /// Open the window and animate until it is closed.
    pub fn run(self) -> Result<(), BackdropError> {
        self.validate()?;
        log::info!(
            "starting: particles {}, tesseract {}",
            if self.particles.is_some() { "on" } else { "off" },
            match &self.tesseract {
                Some(t) => format!("on ({:?})", t.mode),
                None => "off".to_string(),
            }
        );

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    settings: Backdrop,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    field: Option<ParticleField>,
    view: Option<TesseractView>,
    clock: FrameClock,
    error: Option<BackdropError>,
}

impl App {
    fn new(settings: Backdrop) -> Self {
        Self {
            settings,
            window: None,
            gpu_state: None,
            field: None,
            view: None,
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackdropError> {
        let (width, height) = self.settings.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let size = window.inner_size();

        self.field = self
            .settings
            .particles
            .as_ref()
            .map(|c| ParticleField::new(c, Viewport::new(size.width as f32, size.height as f32)));
        self.view = self
            .settings
            .tesseract
            .as_ref()
            .map(|c| TesseractView::new(c, size.width, size.height));

        let gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            self.settings.particles.as_ref(),
            self.settings.tesseract.as_ref(),
            self.settings.background,
        ))?;

        self.gpu_state = Some(gpu_state);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        log::debug!("resized to {}x{}", size.width, size.height);
        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.resize(size);
        }
        if let Some(field) = &mut self.field {
            field.resize(size.width as f32, size.height as f32);
        }
        if let Some(view) = &mut self.view {
            view.resize(size.width, size.height);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(field) = &mut self.field {
            field.step();
        }
        if let Some(view) = &mut self.view {
            view.advance();
        }
        if let Some(fps) = self.clock.tick() {
            log::debug!("frame {}: {:.1} fps", self.clock.frame(), fps);
        }

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };
        let scene = Scene {
            field: self.field.as_ref(),
            wireframe: self.view.as_ref().map(|v| (v.segments(), v.view_proj())),
        };
        match gpu_state.render(&scene) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = gpu_state.size();
                log::debug!("surface lost, reconfiguring at {}x{}", width, height);
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, stopping");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
