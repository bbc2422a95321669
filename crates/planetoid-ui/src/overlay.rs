//! egui integration: winit input in, wgpu draw out.
//!
//! The overlay pass loads the scene's color target and draws the panel on
//! top without a depth attachment.

use planetoid_render::{FrameEncoder, RenderPassBuilder};
use winit::event::WindowEvent;
use winit::window::Window;

/// Tessellated output of one egui frame, ready to paint.
pub struct EguiFrame {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

impl EguiFrame {
    pub fn is_empty(&self) -> bool {
        self.paint_jobs.is_empty() && self.textures_delta.is_empty()
    }
}

pub struct EguiOverlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl EguiOverlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let max_texture_side = device.limits().max_texture_dimension_2d as usize;
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            window.theme(),
            Some(max_texture_side),
        );
        let renderer =
            egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
        }
    }

    pub fn context(&self) -> &egui::Context {
        &self.ctx
    }

    /// Forward a window event. Returns `true` when egui consumed it and the
    /// scene should not see it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Whether the pointer is over (or dragging) a panel widget.
    pub fn wants_pointer_input(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.is_pointer_over_area()
    }

    /// Run one egui frame and tessellate it.
    pub fn run(&mut self, window: &Window, build_ui: impl FnMut(&egui::Context)) -> EguiFrame {
        let raw_input = self.state.take_egui_input(window);
        let output = self.ctx.run(raw_input, build_ui);
        self.state
            .handle_platform_output(window, output.platform_output);

        EguiFrame {
            paint_jobs: self.ctx.tessellate(output.shapes, output.pixels_per_point),
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        }
    }

    /// Record the overlay into `frame`. The returned command buffers must be
    /// submitted before the frame's own encoder.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &mut FrameEncoder,
        size_in_pixels: [u32; 2],
        egui_frame: EguiFrame,
    ) -> Vec<wgpu::CommandBuffer> {
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: egui_frame.pixels_per_point,
        };

        for (id, delta) in &egui_frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }
        let commands = self.renderer.update_buffers(
            device,
            queue,
            frame.encoder_mut(),
            &egui_frame.paint_jobs,
            &screen,
        );

        {
            let builder = RenderPassBuilder::new().load_existing().label("egui-pass");
            let mut pass = frame.begin_render_pass(&builder).forget_lifetime();
            self.renderer
                .render(&mut pass, &egui_frame.paint_jobs, &screen);
        }

        for id in &egui_frame.textures_delta.free {
            self.renderer.free_texture(id);
        }
        commands
    }
}
