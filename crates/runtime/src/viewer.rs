use crate::clock::Clock;
use crate::config::ViewerConfig;
use glam::Vec3;
use primview_common::{SurfaceSize, Viewport};
use primview_input::{OrbitControls, OrbitGesture};
use primview_render::Renderer;
use primview_scene::{PerspectiveCamera, Scene, SceneChange};
use std::time::Duration;

/// Render loop lifecycle. Running has no exit transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    Running,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    #[error("render loop has not been started")]
    NotStarted,
    #[error("render loop is already running")]
    AlreadyRunning,
}

/// The viewer runtime: owns the scene, camera, orbit controls and renderer
/// and drives them once per frame.
pub struct Viewer<R: Renderer> {
    clock: Clock,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    renderer: R,
    viewport: Viewport,
    /// Backing size last handed to the renderer.
    surface: Option<SurfaceSize>,
    state: LoopState,
    frames: u64,
}

impl<R: Renderer> Viewer<R> {
    /// Build the scene, camera and controls for a host `viewport`.
    /// Nothing is sized or rendered until [`start`](Self::start).
    pub fn new(config: &ViewerConfig, viewport: Viewport, renderer: R) -> Self {
        let scene = Scene::new(config.shape);
        let camera = PerspectiveCamera::default();
        let controls = OrbitControls::damped(Vec3::ZERO, config.damping_factor);
        tracing::info!(
            shape = %config.shape,
            nodes = scene.node_count(),
            damping = config.damping_factor,
            "viewer created"
        );
        Self {
            clock: Clock::new(),
            scene,
            camera,
            controls,
            renderer,
            viewport,
            surface: None,
            state: LoopState::NotStarted,
            frames: 0,
        }
    }

    /// Run the initial resize pass and enter the Running state. The clock
    /// keeps running from [`new`](Self::new), so the first frame's delta
    /// includes any setup time in between.
    pub fn start(&mut self) -> Result<(), ViewerError> {
        if self.state == LoopState::Running {
            return Err(ViewerError::AlreadyRunning);
        }
        self.resize(self.viewport);
        self.state = LoopState::Running;
        tracing::info!(viewport = ?self.viewport, "render loop started");
        Ok(())
    }

    /// Resize handler. Updates the camera aspect and projection and tells
    /// the renderer the new backing size. Returns whether anything changed;
    /// repeating a call with the same viewport is a no-op.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.viewport = viewport;
        let size = viewport.surface_size();
        let aspect = viewport.aspect();

        let mut changed = false;
        if self.camera.aspect != aspect {
            self.camera.aspect = aspect;
            self.camera.update_projection_matrix();
            changed = true;
        }
        if self.surface != Some(size) {
            self.renderer.resize(size);
            self.surface = Some(size);
            changed = true;
        }
        if changed {
            tracing::debug!(%size, aspect, "viewport resized");
        }
        changed
    }

    /// One loop iteration: clock delta, controls update, then render.
    pub fn frame(&mut self) -> Result<R::Output, ViewerError> {
        if self.state != LoopState::Running {
            return Err(ViewerError::NotStarted);
        }
        let dt = self.clock.delta();
        Ok(self.step(dt))
    }

    fn step(&mut self, dt: Duration) -> R::Output {
        self.controls.update(&mut self.camera, dt);
        self.frames += 1;
        self.renderer.render(&self.scene, &self.camera)
    }

    /// Apply a debug panel edit before the next frame.
    pub fn apply(&mut self, change: SceneChange) -> bool {
        self.scene.apply(change)
    }

    /// Feed a pointer gesture to the orbit controls. Pointer deltas are in
    /// backing pixels.
    pub fn handle_gesture(&mut self, gesture: OrbitGesture) {
        let height = self.viewport.surface_size().height as f32;
        self.controls.handle(gesture, height, &self.camera);
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primview_render::DebugTextRenderer;
    use primview_scene::ShapeKind;

    /// Records every call it receives, in order.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Renderer for Recorder {
        type Output = Vec3;

        fn resize(&mut self, size: SurfaceSize) {
            self.calls.push(format!("resize {size}"));
        }

        fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Vec3 {
            self.calls.push(format!("render r{}", scene.revision()));
            camera.position()
        }
    }

    fn viewport(w: f64, h: f64) -> Viewport {
        Viewport::new(w, h, 1.0).unwrap()
    }

    fn started(w: f64, h: f64) -> Viewer<Recorder> {
        let mut viewer = Viewer::new(&ViewerConfig::default(), viewport(w, h), Recorder::default());
        viewer.start().unwrap();
        viewer
    }

    #[test]
    fn frame_before_start_is_an_error() {
        let mut viewer = Viewer::new(
            &ViewerConfig::default(),
            viewport(800.0, 600.0),
            Recorder::default(),
        );
        assert_eq!(viewer.state(), LoopState::NotStarted);
        assert_eq!(viewer.frame(), Err(ViewerError::NotStarted));
        assert!(viewer.renderer().calls.is_empty());
    }

    #[test]
    fn start_runs_resize_pass_once() {
        let mut viewer = started(1920.0, 1080.0);
        assert_eq!(viewer.state(), LoopState::Running);
        assert_eq!(viewer.renderer().calls, vec!["resize 1920x1080"]);
        assert!((viewer.camera().aspect - 1.7778).abs() < 1e-3);
        assert_eq!(viewer.start(), Err(ViewerError::AlreadyRunning));
    }

    #[test]
    fn aspect_matches_viewport_ratio() {
        let mut viewer = started(800.0, 600.0);
        for (w, h) in [(1.0, 1.0), (640.0, 480.0), (333.0, 777.0), (3840.0, 1.0)] {
            viewer.resize(viewport(w, h));
            assert_eq!(viewer.camera().aspect, (w / h) as f32);
        }
    }

    #[test]
    fn resize_is_idempotent() {
        let mut viewer = started(800.0, 600.0);
        let vp = Viewport::new(1024.0, 768.0, 2.0).unwrap();
        assert!(viewer.resize(vp));
        let projection = viewer.camera().projection_matrix();
        let calls = viewer.renderer().calls.len();

        assert!(!viewer.resize(vp));
        assert_eq!(viewer.renderer().calls.len(), calls);
        assert_eq!(viewer.camera().projection_matrix(), projection);
        assert_eq!(viewer.renderer().calls.last().unwrap(), "resize 2048x1536");
    }

    #[test]
    fn pixel_ratio_change_resizes_backing_only() {
        let mut viewer = started(800.0, 600.0);
        let aspect = viewer.camera().aspect;
        assert!(viewer.resize(Viewport::new(800.0, 600.0, 1.5).unwrap()));
        assert_eq!(viewer.camera().aspect, aspect);
        assert_eq!(viewer.renderer().calls.last().unwrap(), "resize 1200x900");
    }

    #[test]
    fn frame_updates_controls_before_render() {
        let mut viewer = started(800.0, 600.0);
        viewer.handle_gesture(OrbitGesture::Rotate(glam::Vec2::new(100.0, 0.0)));
        let before = viewer.camera().position();

        let rendered = viewer.step(Duration::from_millis(16));
        // The renderer saw the camera after this frame's damping step.
        assert_ne!(rendered, before);
        assert_eq!(rendered, viewer.camera().position());
        assert_eq!(viewer.frames(), 1);
    }

    #[test]
    fn first_delta_counts_from_viewer_creation() {
        let mut viewer = Viewer::new(
            &ViewerConfig::default(),
            viewport(800.0, 600.0),
            Recorder::default(),
        );
        std::thread::sleep(Duration::from_millis(20));
        viewer.start().unwrap();
        viewer.frame().unwrap();
        assert!(viewer.clock().elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn frame_renders_once_per_call() {
        let mut viewer = started(800.0, 600.0);
        viewer.frame().unwrap();
        viewer.frame().unwrap();
        let renders = viewer
            .renderer()
            .calls
            .iter()
            .filter(|c| c.starts_with("render"))
            .count();
        assert_eq!(renders, 2);
        assert_eq!(viewer.frames(), 2);
    }

    #[test]
    fn panel_change_visible_on_next_render() {
        let mut viewer = Viewer::new(
            &ViewerConfig::default(),
            viewport(800.0, 600.0),
            DebugTextRenderer::new(),
        );
        viewer.start().unwrap();
        viewer.apply(SceneChange::SetPointLightPosition(Vec3::ONE));
        let output = viewer.frame().unwrap();
        assert!(output.contains("point pos=(1.00, 1.00, 1.00)"));
        assert!(output.contains("800x600"));
    }

    #[test]
    fn configured_shape_is_the_only_visible_one() {
        let config = ViewerConfig {
            shape: ShapeKind::Sphere,
            ..ViewerConfig::default()
        };
        let mut viewer = Viewer::new(&config, viewport(800.0, 600.0), DebugTextRenderer::new());
        viewer.start().unwrap();
        let output = viewer.frame().unwrap();
        assert!(output.contains("mesh Sphere visible=true"));
        assert!(output.contains("mesh Cube visible=false"));
        assert!(output.contains("mesh Knot visible=false"));
    }

    #[test]
    fn rotation_is_independent_of_pixel_ratio() {
        let mut low = started(800.0, 600.0);
        let mut high = started(800.0, 600.0);
        high.resize(Viewport::new(800.0, 600.0, 2.0).unwrap());

        // The same physical drag spans twice the backing pixels at ratio 2.
        low.handle_gesture(OrbitGesture::Rotate(glam::Vec2::new(100.0, 40.0)));
        high.handle_gesture(OrbitGesture::Rotate(glam::Vec2::new(200.0, 80.0)));
        low.step(Duration::from_millis(16));
        high.step(Duration::from_millis(16));
        assert!(low.camera().position().abs_diff_eq(high.camera().position(), 1e-5));
    }

    #[test]
    fn damped_camera_settles_over_frames() {
        let mut viewer = started(800.0, 600.0);
        viewer.handle_gesture(OrbitGesture::Rotate(glam::Vec2::new(200.0, 50.0)));
        for _ in 0..600 {
            viewer.step(Duration::from_secs_f32(1.0 / 60.0));
        }
        assert!(viewer.controls().is_settled());
        let distance = viewer.camera().position().length();
        assert!((distance - Vec3::new(2.0, 1.0, 2.0).length()).abs() < 1e-3);
    }
}
