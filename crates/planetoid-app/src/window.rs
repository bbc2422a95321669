//! Window creation and event handling via winit.
//!
//! [`AppState`] implements winit's [`ApplicationHandler`]. Pointer events go
//! to the control panel first; whatever it does not consume drives the orbit
//! controls. Every redraw polls the shader loader, advances the session,
//! draws the scene and the panel, then requests the next redraw.

use std::sync::Arc;
use std::time::Instant;

use planetoid_config::Config;
use planetoid_input::MouseState;
use planetoid_render::{
    DepthBuffer, FrameEncoder, MsaaTarget, RenderContext, RenderPassBuilder, SPACE_BLACK,
    ShaderLoader, ShaderSources, SurfaceError, SurfaceWrapper, init_render_context_blocking,
};
use planetoid_scene::{Session, assemble};
use planetoid_ui::{ControlPanel, EguiOverlay, apply_changes};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::renderer::SceneRenderer;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_fullscreen(
            config
                .window
                .fullscreen
                .then_some(Fullscreen::Borderless(None)),
        )
}

pub struct AppState {
    pub config: Config,
    pub window: Option<Arc<Window>>,
    pub gpu: Option<RenderContext>,
    pub depth: Option<DepthBuffer>,
    /// Multisampled scene target; `None` when rendering single-sampled.
    pub msaa: Option<MsaaTarget>,
    pub surface_wrapper: SurfaceWrapper,
    pub session: Session,
    pub mouse: MouseState,
    pub panel: ControlPanel,
    overlay: Option<EguiOverlay>,
    loader: Option<ShaderLoader>,
    renderer: Option<SceneRenderer>,
    sample_count: u32,
    frame_count: u64,
    fatal: Option<AppError>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let session = Session::new(&config);
        let panel = ControlPanel::from_uniforms(&session.uniforms);
        Self {
            surface_wrapper: SurfaceWrapper::new(config.window.width, config.window.height, 1.0),
            config,
            window: None,
            gpu: None,
            depth: None,
            msaa: None,
            sample_count: 1,
            session,
            mouse: MouseState::new(),
            panel,
            overlay: None,
            loader: None,
            renderer: None,
            frame_count: 0,
            fatal: None,
        }
    }

    /// Whether the shaders arrived and the world has been built.
    pub fn is_ready(&self) -> bool {
        self.renderer.is_some() && self.session.is_ready()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    /// Resize the camera, surface and depth buffer together.
    fn apply_resize(&mut self, width: u32, height: u32) {
        let (w, h) = self.session.resize(width, height);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(w, h);
            if let Some(depth) = &mut self.depth {
                depth.resize(&gpu.device, w, h);
            }
            if let Some(msaa) = &mut self.msaa {
                msaa.resize(&gpu.device, w, h);
            }
        }
    }

    /// Pick up the shader loader's result once it arrives.
    fn poll_shaders(&mut self) {
        let Some(result) = self.loader.as_mut().and_then(ShaderLoader::poll) else {
            return;
        };
        self.loader = None;
        match result {
            Ok(sources) => self.build_scene(&sources),
            Err(e) => error!("Shader loading failed, scene stays hidden: {e}"),
        }
    }

    fn build_scene(&mut self, sources: &ShaderSources) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        if self.is_ready() {
            return;
        }
        let world = assemble(&self.config.world, None);
        match SceneRenderer::build(
            &gpu.device,
            gpu.surface_format,
            self.sample_count,
            sources,
            &world,
            &self.config.world,
        ) {
            Ok(renderer) => {
                info!(shaders = renderer.shader_count(), "Scene ready");
                self.renderer = Some(renderer);
                self.session.install_world(world);
            }
            Err(e) => error!("Failed to build scene, scene stays hidden: {e}"),
        }
    }

    fn redraw(&mut self) {
        self.poll_shaders();

        let (Some(window), Some(gpu), Some(depth), Some(overlay)) = (
            self.window.as_ref(),
            self.gpu.as_ref(),
            self.depth.as_ref(),
            self.overlay.as_mut(),
        ) else {
            return;
        };

        let viewport_height = self.surface_wrapper.physical_size().height as f32;
        if !overlay.wants_pointer_input() {
            self.session.handle_mouse(&self.mouse, viewport_height);
        }
        self.mouse.clear_transients();
        self.session.advance_frame(Instant::now());

        let panel = &mut self.panel;
        let mut changes = Vec::new();
        let egui_frame = overlay.run(window, |ctx| changes = panel.show(ctx));
        apply_changes(&changes, &mut self.session.uniforms);

        if let Some(renderer) = &self.renderer
            && let Err(e) = renderer.prepare(&gpu.queue, &self.session)
        {
            warn!("Skipping uniform upload: {e}");
        }

        let surface_texture = match gpu.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                debug!("Surface timeout, skipping frame");
                window.request_redraw();
                return;
            }
            Err(e) => {
                warn!("Failed to acquire surface texture: {e}");
                window.request_redraw();
                return;
            }
        };

        let mut frame = FrameEncoder::new(&gpu.device, surface_texture);
        {
            let mut builder = RenderPassBuilder::new()
                .clear_color(SPACE_BLACK)
                .depth(depth.view.clone(), DepthBuffer::CLEAR_VALUE)
                .label("scene-pass");
            if let Some(msaa) = &self.msaa {
                builder = builder.resolve_from(msaa.view.clone());
            }
            let mut pass = frame.begin_render_pass(&builder);
            if let Some(renderer) = &self.renderer {
                renderer.draw(&mut pass);
            }
        }

        let (width, height) = gpu.size();
        let commands = overlay.paint(
            &gpu.device,
            &gpu.queue,
            &mut frame,
            [width, height],
            egui_frame,
        );
        frame.submit(&gpu.queue, commands);

        self.frame_count += 1;
        if self.frame_count.is_multiple_of(600) {
            debug!(frames = self.frame_count, "Frame loop alive");
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let inner_size = window.inner_size();
        self.surface_wrapper =
            SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor);
        self.session.resize(inner_size.width, inner_size.height);
        info!(
            "Surface wrapper initialized: {}x{} (scale: {:.2})",
            inner_size.width, inner_size.height, scale_factor
        );

        let gpu = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => gpu,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let (width, height) = gpu.size();
        self.sample_count = gpu.supported_sample_count(self.config.window.msaa_samples);
        self.depth = Some(DepthBuffer::multisampled(
            &gpu.device,
            width,
            height,
            self.sample_count,
        ));
        self.msaa = MsaaTarget::new(
            &gpu.device,
            gpu.surface_format,
            width,
            height,
            self.sample_count,
        );
        info!(samples = self.sample_count, "Scene antialiasing");
        self.overlay = Some(EguiOverlay::new(&window, &gpu.device, gpu.surface_format));
        self.gpu = Some(gpu);

        match ShaderLoader::spawn(self.config.shaders.dir.clone()) {
            Ok(loader) => self.loader = Some(loader),
            Err(e) => error!("Failed to start shader loader, scene stays hidden: {e}"),
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let consumed = match (&self.window, &mut self.overlay) {
            (Some(window), Some(overlay)) => overlay.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = self
                    .surface_wrapper
                    .handle_resize(new_size.width, new_size.height)
                {
                    self.apply_resize(resize.physical.width, resize.physical.height);
                    info!(
                        "Window resized to {}x{} (scale: {:.2})",
                        resize.physical.width, resize.physical.height, resize.scale_factor
                    );
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let inner = window.inner_size();
                    let resize = self.surface_wrapper.handle_scale_factor_changed(
                        scale_factor,
                        inner.width,
                        inner.height,
                    );
                    self.apply_resize(resize.physical.width, resize.physical.height);
                    info!("Scale factor changed to {scale_factor:.2}");
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ if consumed => {}
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.on_scroll(delta);
            }
            WindowEvent::CursorEntered { .. } => {
                self.mouse.on_cursor_entered();
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse.on_cursor_left();
            }
            _ => {}
        }
    }
}

/// Create the event loop and run until the window closes.
#[instrument(skip(config))]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::new(config);
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_not_ready() {
        let state = AppState::new(Config::default());
        assert!(state.window.is_none());
        assert!(!state.is_ready());
        assert_eq!(state.frame_count(), 0);
        assert!(state.msaa.is_none());
        assert_eq!(state.sample_count, 1);
        assert_eq!(state.surface_wrapper.physical_size().width, 1280);
    }

    #[test]
    fn test_resize_without_gpu_updates_camera() {
        let mut state = AppState::new(Config::default());
        state.apply_resize(1000, 500);
        assert!((state.session.camera.aspect_ratio - 2.0).abs() < 1e-6);
        state.apply_resize(0, 0);
        assert!((state.session.camera.aspect_ratio - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_panel_seeded_from_session() {
        let state = AppState::new(Config::default());
        assert_eq!(state.panel.len(), planetoid_ui::ControlId::ALL.len());
    }

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.title = "Test".to_string();
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Test");
        assert!(attrs.fullscreen.is_none());
    }
}
