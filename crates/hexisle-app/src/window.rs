//! Window, GPU state and input wiring around a finished island.

use std::sync::Arc;

use hexisle_config::Config;
use hexisle_materials::TextureSet;
use hexisle_render::{
    Camera, OrbitController, RenderContext, SceneRenderer, SurfaceError,
    init_render_context_blocking,
};
use hexisle_scene::SceneGraph;
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::game_loop::GameLoop;
use crate::input::MouseState;
use crate::startup::{initial_camera, render_settings};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("{0}")]
    Startup(String),
}

pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// GPU objects, created on the first `resumed`.
struct Gpu {
    window: Arc<Window>,
    context: RenderContext,
    renderer: SceneRenderer,
}

pub struct IslandApp {
    config: Config,
    scene: SceneGraph,
    textures: TextureSet,
    gpu: Option<Gpu>,
    camera: Camera,
    orbit: OrbitController,
    game_loop: GameLoop,
    mouse: MouseState,
    /// First fatal error seen inside the event loop, reported by [`run`].
    failure: Option<String>,
}

impl IslandApp {
    pub fn new(config: Config, scene: SceneGraph, textures: TextureSet) -> Self {
        let (camera, orbit) =
            initial_camera(&config.camera, config.window.width, config.window.height);
        Self {
            config,
            scene,
            textures,
            gpu: None,
            camera,
            orbit,
            game_loop: GameLoop::new(),
            mouse: MouseState::new(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, message: String) {
        error!("{message}");
        self.failure.get_or_insert(message);
        event_loop.exit();
    }

    fn create_gpu(&self, event_loop: &ActiveEventLoop) -> Result<Gpu, String> {
        let window = event_loop
            .create_window(window_attributes_from_config(&self.config))
            .map(Arc::new)
            .map_err(|e| format!("failed to create window: {e}"))?;
        let context = init_render_context_blocking(window.clone(), self.config.window.vsync)
            .map_err(|e| format!("GPU initialization failed: {e}"))?;
        let renderer = SceneRenderer::new(
            &context.device,
            &context.queue,
            context.surface_format,
            context.size(),
            &self.scene,
            &self.textures,
            &render_settings(&self.config.render),
        )
        .map_err(|e| format!("texture upload failed: {e}"))?;
        Ok(Gpu {
            window,
            context,
            renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.context.resize(width, height);
            let (width, height) = gpu.context.size();
            gpu.renderer.resize(&gpu.context.device, width, height);
            debug!("Resized to {width}x{height}");
        }
        self.camera.set_aspect_ratio(width, height);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.mouse.is_dragging() {
            let delta = self.mouse.delta();
            self.orbit.rotate(delta.x, delta.y);
        }
        self.orbit.zoom(self.mouse.scroll());
        self.mouse.clear_transients();

        let orbit = &mut self.orbit;
        let camera = &mut self.camera;
        self.game_loop.tick(
            |_dt| {
                orbit.update();
                orbit.apply(camera);
            },
            |_alpha| {},
        );

        let frame_result = match &self.gpu {
            Some(gpu) => render_frame(gpu, &self.camera),
            None => Ok(()),
        };
        match frame_result {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => debug!("Surface timeout, skipping frame"),
            Err(e) => self.fail(event_loop, format!("surface error: {e}")),
        }
    }
}

fn render_frame(gpu: &Gpu, camera: &Camera) -> Result<(), SurfaceError> {
    let frame = gpu.context.get_current_texture()?;
    let view = frame
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    gpu.renderer
        .render(&gpu.context.device, &gpu.context.queue, &view, camera);
    gpu.window.pre_present_notify();
    frame.present();
    Ok(())
}

impl ApplicationHandler for IslandApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match self.create_gpu(event_loop) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                info!(
                    "Window ready at {}x{} (scale {:.2})",
                    size.width,
                    size.height,
                    gpu.window.scale_factor()
                );
                self.camera.set_aspect_ratio(size.width, size.height);
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(message) => self.fail(event_loop, message),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => self.mouse.on_cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => self.mouse.on_button(button, state),
            WindowEvent::MouseWheel { delta, .. } => self.mouse.on_scroll(delta),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        info!(
            frames = self.game_loop.frame_count(),
            updates = self.game_loop.update_count(),
            "Event loop finished"
        );
        if self.gpu.take().is_none() {
            warn!("Exiting before the GPU was initialised");
        }
    }
}

/// Opens the window and blocks until it is closed.
pub fn run(config: Config, scene: SceneGraph, textures: TextureSet) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = IslandApp::new(config, scene, textures);
    event_loop.run_app(&mut app)?;
    match app.failure {
        Some(message) => Err(AppError::Startup(message)),
        None => Ok(()),
    }
}
