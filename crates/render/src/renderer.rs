use primview_common::SurfaceSize;
use primview_scene::{NodeRef, PerspectiveCamera, Scene};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and camera and produces output. It never
/// mutates either; the viewer runtime owns them.
pub trait Renderer {
    /// The output type produced by one frame.
    type Output;

    /// The backing resolution changed.
    fn resize(&mut self, size: SurfaceSize);

    /// Render one frame of `scene` as seen through `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;
}

/// Text renderer: describes each frame instead of drawing it.
///
/// Useful for the headless CLI, logging, and testing the frame loop.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    size: Option<SurfaceSize>,
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn resize(&mut self, size: SurfaceSize) {
        self.size = Some(size);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        self.frames += 1;

        let mut out = String::new();
        let size = self
            .size
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unsized".into());
        let _ = writeln!(
            out,
            "=== Frame {} ({size}, revision={}) ===",
            self.frames,
            scene.revision()
        );
        let p = camera.position();
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}",
            p.x, p.y, p.z, camera.fov_degrees, camera.aspect
        );

        for node in scene.nodes() {
            match node {
                NodeRef::HemisphereLight(light) => {
                    let _ = writeln!(
                        out,
                        "  [{}] hemisphere sky=#{:06x} ground=#{:06x} intensity={:.2}",
                        light.id.short(),
                        light.sky_color.to_hex(),
                        light.ground_color.to_hex(),
                        light.intensity
                    );
                }
                NodeRef::PointLight(light) => {
                    let lp = light.position;
                    // Falloff where the primitives sit.
                    let falloff = light.attenuation(lp.length());
                    let _ = writeln!(
                        out,
                        "  [{}] point pos=({:.2}, {:.2}, {:.2}) intensity={:.2} falloff={falloff:.3} shadow={}",
                        light.id.short(),
                        lp.x,
                        lp.y,
                        lp.z,
                        light.intensity,
                        light.cast_shadow
                    );
                }
                NodeRef::Mesh { mesh, visible } => {
                    let _ = writeln!(
                        out,
                        "  [{}] mesh {} visible={visible} shadow={}/{}",
                        mesh.id.short(),
                        mesh.kind,
                        mesh.cast_shadow,
                        mesh.receive_shadow
                    );
                }
            }
        }

        let m = scene.material();
        let _ = writeln!(
            out,
            "Material: color=#{:06x} emissive=#{:06x} shininess={:.1}",
            m.color.to_hex(),
            m.emissive.to_hex(),
            m.shininess
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use primview_scene::{SceneChange, ShapeKind};

    #[test]
    fn renders_default_scene() {
        let scene = Scene::default();
        let camera = PerspectiveCamera::default();
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &camera);

        assert!(output.contains("Frame 1 (unsized"));
        assert!(output.contains("mesh Cube visible=true"));
        assert!(output.contains("mesh Sphere visible=false"));
        assert!(output.contains("mesh Knot visible=false"));
        assert!(output.contains("hemisphere sky=#d3e2e9 ground=#856b38"));
        assert!(output.contains("shadow=true"));
    }

    #[test]
    fn reports_size_after_resize() {
        let mut renderer = DebugTextRenderer::new();
        renderer.resize(SurfaceSize::new(1920, 1080));
        let output = renderer.render(&Scene::default(), &PerspectiveCamera::default());
        assert!(output.contains("1920x1080"));
        assert_eq!(renderer.size(), Some(SurfaceSize::new(1920, 1080)));
    }

    #[test]
    fn reflects_scene_changes() {
        let mut scene = Scene::default();
        scene.apply(SceneChange::SelectShape(ShapeKind::Knot));
        scene.apply(SceneChange::SetPointLightPosition(Vec3::ONE));

        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &PerspectiveCamera::default());
        assert!(output.contains("mesh Knot visible=true"));
        assert!(output.contains("mesh Cube visible=false"));
        assert!(output.contains("point pos=(1.00, 1.00, 1.00)"));
    }

    #[test]
    fn light_at_the_origin_reports_capped_falloff() {
        let mut scene = Scene::default();
        scene.apply(SceneChange::SetPointLightPosition(Vec3::ZERO));
        let output = DebugTextRenderer::new().render(&scene, &PerspectiveCamera::default());
        assert!(output.contains("falloff=100.000"), "{output}");
    }

    #[test]
    fn counts_frames() {
        let mut renderer = DebugTextRenderer::new();
        let scene = Scene::default();
        let camera = PerspectiveCamera::default();
        renderer.render(&scene, &camera);
        let second = renderer.render(&scene, &camera);
        assert_eq!(renderer.frames(), 2);
        assert!(second.contains("Frame 2"));
    }
}
