//! Bridge between winit events, the egui context and the wgpu renderer.

use std::sync::Arc;

use winit::window::Window;

pub struct EguiIntegration {
    pub ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

/// Tessellated output of one egui pass.
pub struct EguiFrameOutput {
    pub paint_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    /// Scale egui laid this frame out at (window scale factor times zoom).
    pub pixels_per_point: f32,
}

impl EguiFrameOutput {
    fn tessellate(ctx: &egui::Context, full_output: egui::FullOutput) -> Self {
        let pixels_per_point = full_output.pixels_per_point;
        Self {
            paint_jobs: ctx.tessellate(full_output.shapes, pixels_per_point),
            textures_delta: full_output.textures_delta,
            pixels_per_point,
        }
    }

    /// Screen description for a render target of `size_in_pixels`.
    pub fn screen_descriptor(&self, size_in_pixels: [u32; 2]) -> egui_wgpu::ScreenDescriptor {
        egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: self.pixels_per_point,
        }
    }
}

impl EguiIntegration {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, window: &Arc<Window>) -> Self {
        let ctx = egui::Context::default();

        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let renderer = egui_wgpu::Renderer::new(
            device,
            output_format,
            None,  // depth format
            1,     // msaa samples
            false, // dithering
        );

        Self { ctx, state, renderer }
    }

    /// Feed a window event to egui.
    ///
    /// Returns true if egui consumed it; the camera and shortcuts should
    /// then ignore the event.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run one UI pass.
    pub fn run<R>(&mut self, window: &Window, ui: impl FnOnce(&egui::Context) -> R) -> (R, EguiFrameOutput) {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
        let result = ui(&self.ctx);
        let mut full_output = self.ctx.end_pass();

        let platform_output = std::mem::take(&mut full_output.platform_output);
        self.state.handle_platform_output(window, platform_output);

        (result, EguiFrameOutput::tessellate(&self.ctx, full_output))
    }

    /// Upload textures and vertex data. Returns command buffers that must be
    /// submitted before the encoder that draws the UI.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output: &EguiFrameOutput,
        screen: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }
        self.renderer
            .update_buffers(device, queue, encoder, &output.paint_jobs, screen)
    }

    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        output: &EguiFrameOutput,
        screen: &egui_wgpu::ScreenDescriptor,
    ) {
        self.renderer.render(render_pass, &output.paint_jobs, screen);
    }

    /// Free textures egui no longer needs. Call after submitting the frame.
    pub fn cleanup(&mut self, output: &EguiFrameOutput) {
        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
