use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use glam::Vec2;
use primview_common::Viewport;
use primview_input::{PointerButton, PointerTracker};
use primview_render_wgpu::{Frame, GpuContext, WgpuRenderer};
use primview_runtime::{Viewer, ViewerConfig};
use primview_scene::{Scene, ShapeKind};
use primview_tools::DebugPanel;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "primview-desktop", about = "Primitive viewer with orbit controls")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML or JSON viewer config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long)]
    width: Option<u32>,

    /// Initial window height in logical pixels
    #[arg(long)]
    height: Option<u32>,

    /// Primitive to show first: cube, sphere or knot
    #[arg(short, long)]
    shape: Option<ShapeKind>,
}

impl Cli {
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ViewerConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(shape) = self.shape {
            config.shape = shape;
        }
        config.validate()?;
        Ok(config)
    }
}

/// egui texture uploads and frees not yet applied to the GPU.
///
/// A frame skipped because the surface was lost still carries texture
/// deltas (the font atlas on the first frame); they are held here until a
/// frame is painted.
#[derive(Default)]
struct TextureQueue {
    pending: egui::TexturesDelta,
}

impl TextureQueue {
    fn push(&mut self, delta: egui::TexturesDelta) {
        self.pending.append(delta);
    }

    fn take(&mut self) -> egui::TexturesDelta {
        std::mem::take(&mut self.pending)
    }
}

/// Everything that exists only once the window does.
struct Graphics {
    window: Arc<Window>,
    viewer: Viewer<WgpuRenderer>,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    textures: TextureQueue,
}

struct GpuApp {
    config: ViewerConfig,
    panel: DebugPanel,
    pointer: PointerTracker,
    egui_ctx: EguiContext,
    gfx: Option<Graphics>,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(config: ViewerConfig) -> Self {
        Self {
            panel: DebugPanel::new(config.show_panel),
            config,
            pointer: PointerTracker::new(),
            egui_ctx: EguiContext::default(),
            gfx: None,
            fatal: None,
        }
    }

    fn init_graphics(&self, event_loop: &ActiveEventLoop) -> Result<Graphics> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.as_str())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);

        let size = window.inner_size();
        let viewport = Viewport::from_physical(size.width, size.height, window.scale_factor())
            .context("initial window size")?;

        let context = GpuContext::new(
            window.clone(),
            viewport.surface_size(),
            self.config.msaa_samples,
        )?;
        let format = context.format();
        let renderer = WgpuRenderer::new(context, &Scene::new(self.config.shape));

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&renderer.context().device, format, None, 1, false);

        let mut viewer = Viewer::new(&self.config, viewport, renderer);
        viewer.start()?;

        Ok(Graphics {
            window,
            viewer,
            egui_winit,
            egui_renderer,
            textures: TextureQueue::default(),
        })
    }

    fn redraw(&mut self) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };

        let raw_input = gfx.egui_winit.take_egui_input(&gfx.window);
        let mut changes = Vec::new();
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            changes = self.panel.show(ctx, gfx.viewer.scene());
        });
        gfx.egui_winit
            .handle_platform_output(&gfx.window, full_output.platform_output);
        gfx.textures.push(full_output.textures_delta);

        for change in changes {
            gfx.viewer.apply(change);
        }

        let frame = match gfx.viewer.frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                gfx.window.request_redraw();
                return;
            }
            Err(e) => {
                tracing::error!("frame failed: {e}");
                return;
            }
        };

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let context = gfx.viewer.renderer().context();
        let size = context.size();
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size.width, size.height],
            pixels_per_point: full_output.pixels_per_point,
        };
        paint_overlay(
            &mut gfx.egui_renderer,
            context,
            &frame,
            &paint_jobs,
            &screen,
            &gfx.textures.take(),
        );

        frame.present();
        gfx.window.request_redraw();
    }
}

/// Draw the egui output on top of the resolved scene image.
fn paint_overlay(
    egui_renderer: &mut egui_wgpu::Renderer,
    context: &GpuContext,
    frame: &Frame,
    paint_jobs: &[egui::ClippedPrimitive],
    screen: &egui_wgpu::ScreenDescriptor,
    textures: &egui::TexturesDelta,
) {
    let (device, queue) = (&context.device, &context.queue);
    for (id, image_delta) in &textures.set {
        egui_renderer.update_texture(device, queue, *id, image_delta);
    }
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("egui_encoder"),
    });
    egui_renderer.update_buffers(device, queue, &mut encoder, paint_jobs, screen);
    {
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            })
            .forget_lifetime();
        egui_renderer.render(&mut pass, paint_jobs, screen);
    }
    queue.submit(std::iter::once(encoder.finish()));
    for id in &textures.free {
        egui_renderer.free_texture(id);
    }
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

fn resize(viewer: &mut Viewer<WgpuRenderer>, size: PhysicalSize<u32>, scale_factor: f64) {
    match Viewport::from_physical(size.width, size.height, scale_factor) {
        Ok(viewport) => {
            viewer.resize(viewport);
        }
        Err(e) => tracing::debug!("skipping resize: {e}"),
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }
        match self.init_graphics(event_loop) {
            Ok(gfx) => {
                gfx.window.request_redraw();
                self.gfx = Some(gfx);
            }
            Err(e) => {
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gfx) = self.gfx.as_mut() else {
            return;
        };
        let consumed = gfx.egui_winit.on_window_event(&gfx.window, &event).consumed;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                resize(&mut gfx.viewer, size, gfx.window.scale_factor());
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                resize(&mut gfx.viewer, gfx.window.inner_size(), scale_factor);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::F1),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } if !consumed => {
                self.panel.toggle();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                // Releases always reach the tracker so a drag cannot stick.
                if consumed && pressed {
                    return;
                }
                if let Some(button) = pointer_button(button) {
                    self.pointer.button(button, pressed);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let gesture = self
                    .pointer
                    .moved(Vec2::new(position.x as f32, position.y as f32));
                if let Some(gesture) = gesture.filter(|_| !consumed) {
                    gfx.viewer.handle_gesture(gesture);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.left();
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let gesture = match delta {
                    MouseScrollDelta::LineDelta(_, y) => self.pointer.wheel_lines(y),
                    MouseScrollDelta::PixelDelta(p) => self.pointer.wheel_pixels(p.y as f32),
                };
                if let Some(gesture) = gesture {
                    gfx.viewer.handle_gesture(gesture);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = cli.viewer_config()?;
    tracing::info!(title = %config.title, shape = %config.shape, "primview-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frame(ctx: &EguiContext) -> egui::TexturesDelta {
        ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| ui.label("primview"));
        })
        .textures_delta
    }

    #[test]
    fn skipped_frame_keeps_font_atlas_upload() {
        let ctx = EguiContext::default();
        let mut queue = TextureQueue::default();

        let first = run_frame(&ctx);
        assert!(!first.set.is_empty());
        let uploads = first.set.len();
        queue.push(first);

        // The first frame is skipped; the next one paints.
        queue.push(run_frame(&ctx));
        let painted = queue.take();
        assert!(painted.set.len() >= uploads);
        assert!(painted.set.iter().any(|(id, _)| *id == egui::TextureId::default()));
        assert!(queue.take().is_empty());
    }
}
