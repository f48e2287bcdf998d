//! Window, event loop and per-frame orchestration.

use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::error::ViewerError;
use crate::gpu::{EguiIntegration, GpuState};
use crate::input::Input;
use crate::panel::{ui, DebugPanel, PanelEvent};
use crate::params::GalaxyParams;
use crate::scene::{Scene, SceneBackend};
use crate::time::Time;
use crate::viewport::Viewport;

/// Galaxy viewer builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```no_run
/// use galaxy::{GalaxyParams, Viewer};
///
/// Viewer::new()
///     .with_params(GalaxyParams::default().with_branch_count(5))
///     .with_title("Five arms")
///     .run()
///     .unwrap();
/// ```
pub struct Viewer {
    params: GalaxyParams,
    window_size: (u32, u32),
    title: String,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            params: GalaxyParams::default(),
            window_size: (1280, 720),
            title: "Galaxy".to_string(),
        }
    }

    /// Initial galaxy parameters. Out-of-range values are snapped.
    pub fn with_params(mut self, params: GalaxyParams) -> Self {
        self.params = params.validated();
        self
    }

    /// Initial logical window size.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width.max(1), height.max(1));
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Run the viewer. Blocks until the window is closed.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that needs a live window.
struct Graphics {
    window: Arc<Window>,
    gpu: GpuState,
    egui: EguiIntegration,
    scene: Scene<GpuState>,
}

struct App {
    title: String,
    window_size: (u32, u32),
    graphics: Option<Graphics>,
    panel: DebugPanel,
    input: Input,
    time: Time,
    error: Option<ViewerError>,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        let (width, height) = viewer.window_size;
        Self {
            title: viewer.title,
            window_size: viewer.window_size,
            graphics: None,
            panel: DebugPanel::new(viewer.params),
            input: Input::new(width, height),
            time: Time::new(),
            error: None,
        }
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<Graphics, ViewerError> {
        let (width, height) = self.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let size = window.inner_size();
        let viewport = Viewport::from_physical(size.width, size.height, window.scale_factor());
        let mut gpu = pollster::block_on(GpuState::new(window.clone(), &viewport))?;
        let egui = EguiIntegration::new(gpu.device(), gpu.surface_format(), &window);

        let mut scene = Scene::new(viewport);
        gpu.upload_helpers(scene.graph());
        scene.regenerate(&mut gpu, self.panel.committed());

        self.input.set_window_size(size.width, size.height);
        self.time = Time::new();

        log::info!(
            "viewer ready: {}x{} @{:.2}x, {} particles",
            viewport.width(),
            viewport.height(),
            viewport.scale_factor(),
            self.panel.committed().count
        );

        Ok(Graphics {
            window,
            gpu,
            egui,
            scene,
        })
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(g) = self.graphics.as_mut() else {
            return;
        };

        let (elapsed, _) = self.time.update();

        let drag = self.input.drag_delta();
        if drag != Vec2::ZERO {
            let height = self.input.window_size().1 as f32;
            g.scene.controls_mut().rotate(drag.x, drag.y, height);
        }
        let scroll = self.input.scroll_delta();
        if scroll != 0.0 {
            g.scene.controls_mut().zoom(scroll);
        }
        for shortcut in self.input.shortcuts() {
            self.panel.apply_shortcut(shortcut);
        }

        g.scene.tick(elapsed);

        let panel = &mut self.panel;
        let (events, ui_frame) = g.egui.run(&g.window, |ctx| ui::show(panel, ctx));
        apply_panel_events(&mut g.scene, &mut g.gpu, events);

        match g.gpu.render(&g.scene, Some((&mut g.egui, &ui_frame))) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => g.gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
        g.egui.cleanup(&ui_frame);
        self.input.end_frame();

        if self.time.frame() % 60 == 0 {
            g.window
                .set_title(&format!("{} - {:.0} fps", self.title, self.time.fps()));
        }
        g.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.graphics.is_some() {
            return;
        }
        match self.init_graphics(event_loop) {
            Ok(graphics) => {
                graphics.window.request_redraw();
                self.graphics = Some(graphics);
            }
            Err(e) => {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match self.graphics.as_mut() {
            Some(g) => g.egui.on_window_event(&g.window, &event),
            None => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.input.handle_event(&event);
                if let Some(g) = &mut self.graphics {
                    let scale = g.window.scale_factor();
                    let logical = physical_size.to_logical::<f64>(scale);
                    let resized = g.scene.resize(
                        logical.width.round() as u32,
                        logical.height.round() as u32,
                        scale,
                    );
                    if resized {
                        g.gpu.resize(physical_size.width, physical_size.height, g.scene.viewport());
                    }
                }
            }
            WindowEvent::RedrawRequested => self.frame(event_loop),
            // Releases always reach the input state so nothing stays held.
            WindowEvent::MouseInput { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::Focused(_)
            | WindowEvent::CursorLeft { .. } => {
                if !consumed || !is_press(&event) {
                    self.input.handle_event(&event);
                }
            }
            _ => {
                if !consumed {
                    self.input.handle_event(&event);
                }
            }
        }
    }
}

/// Regenerate for each committed field, in order, and start requested spins.
fn apply_panel_events<B: SceneBackend>(scene: &mut Scene<B>, backend: &mut B, events: Vec<PanelEvent>) {
    for event in events {
        match event {
            PanelEvent::Commit { field, params } => {
                log::debug!("{} changed, regenerating", field.label());
                scene.regenerate(backend, &params);
            }
            PanelEvent::Spin => scene.spin(),
        }
    }
}

fn is_press(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::MouseInput { state, .. } => state.is_pressed(),
        WindowEvent::KeyboardInput { event, .. } => event.state.is_pressed(),
        _ => false,
    }
}
