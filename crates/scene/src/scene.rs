use crate::light::{HemisphereLight, PointLight};
use crate::material::PhongMaterial;
use crate::primitive::{Mesh, PrimitiveSet, ShapeKind};
use glam::Vec3;
use primview_common::{Color, NodeId};
use std::ops::RangeInclusive;

/// Allowed range for each point-light position component.
pub const LIGHT_POSITION_RANGE: RangeInclusive<f32> = -2.0..=2.0;

/// Allowed range for material shininess.
pub const SHININESS_RANGE: RangeInclusive<f32> = 0.0..=1000.0;

/// A mutation requested by the debug panel (or any other editor).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneChange {
    SelectShape(ShapeKind),
    SetPointLightPosition(Vec3),
    SetMaterialColor(Color),
    SetMaterialEmissive(Color),
    SetMaterialShininess(f32),
}

/// Borrowed view of one object in the scene graph.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    HemisphereLight(&'a HemisphereLight),
    PointLight(&'a PointLight),
    Mesh { mesh: &'a Mesh, visible: bool },
}

impl NodeRef<'_> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::HemisphereLight(l) => l.id,
            NodeRef::PointLight(l) => l.id,
            NodeRef::Mesh { mesh, .. } => mesh.id,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            NodeRef::Mesh { visible, .. } => *visible,
            _ => true,
        }
    }
}

/// Scene graph root: owns the lights, the shared material and the
/// primitive set for the lifetime of the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Color,
    hemisphere: HemisphereLight,
    point_light: PointLight,
    material: PhongMaterial,
    primitives: PrimitiveSet,
    /// Bumped on every change that alters what a render would show.
    revision: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(ShapeKind::default())
    }
}

impl Scene {
    /// Build the default scene with `shape` visible.
    pub fn new(shape: ShapeKind) -> Self {
        let hemisphere =
            HemisphereLight::new(Color::from_hex(0xd3e2e9), Color::from_hex(0x856b38), 0.5);

        let mut point_light = PointLight::new(Color::from_hex(0xffffff), 2.0, 100.0);
        point_light.position = Vec3::new(0.5, 0.7, 1.0);
        point_light.cast_shadow = true;

        Self {
            background: Color::BLACK,
            hemisphere,
            point_light,
            material: PhongMaterial::default(),
            primitives: PrimitiveSet::new(shape),
            revision: 0,
        }
    }

    pub fn hemisphere_light(&self) -> &HemisphereLight {
        &self.hemisphere
    }

    pub fn point_light(&self) -> &PointLight {
        &self.point_light
    }

    pub fn material(&self) -> &PhongMaterial {
        &self.material
    }

    pub fn primitives(&self) -> &PrimitiveSet {
        &self.primitives
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Every object in insertion order: lights first, then meshes.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        let lights = [
            NodeRef::HemisphereLight(&self.hemisphere),
            NodeRef::PointLight(&self.point_light),
        ];
        let meshes = self.primitives.iter().map(|mesh| NodeRef::Mesh {
            mesh,
            visible: self.primitives.is_visible(mesh.kind),
        });
        lights.into_iter().chain(meshes)
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Apply a change synchronously. Values are clamped to the ranges the
    /// debug panel exposes. Returns whether the scene changed.
    pub fn apply(&mut self, change: SceneChange) -> bool {
        let changed = match change {
            SceneChange::SelectShape(kind) => self.primitives.select(kind),
            SceneChange::SetPointLightPosition(position) => {
                let clamped = clamp_vec3(position, &LIGHT_POSITION_RANGE);
                replace(&mut self.point_light.position, clamped)
            }
            SceneChange::SetMaterialColor(color) => {
                replace(&mut self.material.color, color.saturate())
            }
            SceneChange::SetMaterialEmissive(color) => {
                replace(&mut self.material.emissive, color.saturate())
            }
            SceneChange::SetMaterialShininess(shininess) => {
                let clamped = shininess.clamp(*SHININESS_RANGE.start(), *SHININESS_RANGE.end());
                replace(&mut self.material.shininess, clamped)
            }
        };
        if changed {
            self.revision += 1;
            tracing::debug!(?change, revision = self.revision, "scene changed");
        }
        changed
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

fn clamp_vec3(v: Vec3, range: &RangeInclusive<f32>) -> Vec3 {
    v.clamp(Vec3::splat(*range.start()), Vec3::splat(*range.end()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_contents() {
        let scene = Scene::default();
        assert_eq!(scene.background, Color::BLACK);
        assert_eq!(scene.node_count(), 5);
        assert_eq!(scene.point_light().position, Vec3::new(0.5, 0.7, 1.0));
        assert!(scene.point_light().cast_shadow);
        assert_eq!(scene.point_light().intensity, 2.0);
        assert_eq!(scene.hemisphere_light().intensity, 0.5);
        assert_eq!(scene.material().shininess, 30.0);
        assert_eq!(scene.primitives().selected(), ShapeKind::Cube);
    }

    #[test]
    fn exactly_one_mesh_node_visible() {
        let mut scene = Scene::default();
        for kind in ShapeKind::ALL {
            scene.apply(SceneChange::SelectShape(kind));
            let visible: Vec<_> = scene
                .nodes()
                .filter(|n| matches!(n, NodeRef::Mesh { .. }) && n.is_visible())
                .collect();
            assert_eq!(visible.len(), 1);
        }
    }

    #[test]
    fn selecting_sphere_hides_cube_and_knot() {
        let mut scene = Scene::default();
        assert!(scene.apply(SceneChange::SelectShape(ShapeKind::Sphere)));
        let prims = scene.primitives();
        assert!(!prims.is_visible(ShapeKind::Cube));
        assert!(prims.is_visible(ShapeKind::Sphere));
        assert!(!prims.is_visible(ShapeKind::Knot));
    }

    #[test]
    fn light_position_is_set_and_clamped() {
        let mut scene = Scene::default();
        scene.apply(SceneChange::SetPointLightPosition(Vec3::ONE));
        assert_eq!(scene.point_light().position, Vec3::ONE);

        scene.apply(SceneChange::SetPointLightPosition(Vec3::new(5.0, -9.0, 0.0)));
        assert_eq!(scene.point_light().position, Vec3::new(2.0, -2.0, 0.0));
    }

    #[test]
    fn shininess_is_clamped() {
        let mut scene = Scene::default();
        scene.apply(SceneChange::SetMaterialShininess(5000.0));
        assert_eq!(scene.material().shininess, 1000.0);
        scene.apply(SceneChange::SetMaterialShininess(-1.0));
        assert_eq!(scene.material().shininess, 0.0);
    }

    #[test]
    fn revision_tracks_effective_changes() {
        let mut scene = Scene::default();
        assert_eq!(scene.revision(), 0);
        assert!(!scene.apply(SceneChange::SelectShape(ShapeKind::Cube)));
        assert_eq!(scene.revision(), 0);
        scene.apply(SceneChange::SetMaterialColor(Color::linear(1.0, 0.0, 0.0)));
        scene.apply(SceneChange::SetMaterialEmissive(Color::linear(0.1, 0.1, 0.1)));
        assert_eq!(scene.revision(), 2);
    }

    #[test]
    fn node_ids_are_distinct() {
        let scene = Scene::default();
        let mut ids: Vec<NodeId> = scene.nodes().map(|n| n.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }
}
