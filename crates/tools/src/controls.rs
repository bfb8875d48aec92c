use glam::Vec3;
use primview_common::Color;
use primview_scene::{LIGHT_POSITION_RANGE, SHININESS_RANGE, Scene, SceneChange, ShapeKind};
use std::ops::RangeInclusive;

/// Key-value object bound to the primitive selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelParams {
    pub shape: ShapeKind,
}

/// A numeric slider: label plus allowed range.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderControl {
    pub label: &'static str,
    pub range: RangeInclusive<f32>,
}

/// The x, y and z sliders of the "Light" folder.
pub fn light_position_controls() -> [SliderControl; 3] {
    ["x", "y", "z"].map(|label| SliderControl {
        label,
        range: LIGHT_POSITION_RANGE,
    })
}

pub fn shininess_control() -> SliderControl {
    SliderControl {
        label: "shininess",
        range: SHININESS_RANGE,
    }
}

/// Options of the primitive selector, in display order.
pub fn shape_options() -> [&'static str; 3] {
    ShapeKind::ALL.map(ShapeKind::label)
}

/// Editable copy of everything the panel exposes.
///
/// The panel edits a snapshot taken from the scene; comparing the edited
/// snapshot with the original yields the change notifications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelState {
    pub params: PanelParams,
    pub light_position: Vec3,
    pub color: [f32; 3],
    pub emissive: [f32; 3],
    pub shininess: f32,
}

impl PanelState {
    pub fn from_scene(scene: &Scene) -> Self {
        let material = scene.material();
        Self {
            params: PanelParams {
                shape: scene.primitives().selected(),
            },
            light_position: scene.point_light().position,
            color: material.color.to_array(),
            emissive: material.emissive.to_array(),
            shininess: material.shininess,
        }
    }

    /// Changes needed to turn `before` into `self`, one per edited control.
    pub fn changes_from(&self, before: &PanelState) -> Vec<SceneChange> {
        let mut changes = Vec::new();
        if self.params.shape != before.params.shape {
            changes.push(SceneChange::SelectShape(self.params.shape));
        }
        if self.light_position != before.light_position {
            changes.push(SceneChange::SetPointLightPosition(self.light_position));
        }
        if self.color != before.color {
            changes.push(SceneChange::SetMaterialColor(Color::from_array(self.color)));
        }
        if self.emissive != before.emissive {
            changes.push(SceneChange::SetMaterialEmissive(Color::from_array(
                self.emissive,
            )));
        }
        if self.shininess != before.shininess {
            changes.push(SceneChange::SetMaterialShininess(self.shininess));
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_match_scene_ranges() {
        for control in light_position_controls() {
            assert_eq!(control.range, -2.0..=2.0);
        }
        assert_eq!(shininess_control().range, 0.0..=1000.0);
        assert_eq!(shape_options(), ["Cube", "Sphere", "Knot"]);
    }

    #[test]
    fn snapshot_reflects_scene() {
        let state = PanelState::from_scene(&Scene::default());
        assert_eq!(state.params.shape, ShapeKind::Cube);
        assert_eq!(state.light_position, Vec3::new(0.5, 0.7, 1.0));
        assert_eq!(state.color, [1.0, 1.0, 1.0]);
        assert_eq!(state.emissive, [0.0, 0.0, 0.0]);
        assert_eq!(state.shininess, 30.0);
    }

    #[test]
    fn untouched_panel_emits_nothing() {
        let state = PanelState::from_scene(&Scene::default());
        assert!(state.changes_from(&state).is_empty());
    }

    #[test]
    fn light_slider_moves_point_light() {
        let mut scene = Scene::default();
        let before = PanelState::from_scene(&scene);
        let mut after = before;
        after.light_position = Vec3::ONE;

        let changes = after.changes_from(&before);
        assert_eq!(changes, vec![SceneChange::SetPointLightPosition(Vec3::ONE)]);
        for change in changes {
            scene.apply(change);
        }
        assert_eq!(scene.point_light().position, Vec3::ONE);
    }

    #[test]
    fn selector_and_material_edits_in_order() {
        let before = PanelState::from_scene(&Scene::default());
        let mut after = before;
        after.params.shape = ShapeKind::Sphere;
        after.shininess = 500.0;
        after.emissive = [0.2, 0.0, 0.0];

        let changes = after.changes_from(&before);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0], SceneChange::SelectShape(ShapeKind::Sphere));
        assert!(matches!(changes[1], SceneChange::SetMaterialEmissive(_)));
        assert_eq!(changes[2], SceneChange::SetMaterialShininess(500.0));
    }
}
