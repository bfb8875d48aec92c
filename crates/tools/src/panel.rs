use crate::controls::{PanelState, light_position_controls, shininess_control};
use primview_scene::{Scene, SceneChange, ShapeKind};

/// On-screen control surface for live-tweaking the scene.
///
/// The panel never mutates the scene itself. [`show`](Self::show) returns
/// the edits as [`SceneChange`]s for the caller to apply before rendering.
#[derive(Debug, Clone)]
pub struct DebugPanel {
    visible: bool,
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DebugPanel {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        tracing::debug!(visible = self.visible, "debug panel toggled");
    }

    /// Draw the panel for the current scene and collect the user's edits.
    pub fn show(&mut self, ctx: &egui::Context, scene: &Scene) -> Vec<SceneChange> {
        if !self.visible {
            return Vec::new();
        }

        let before = PanelState::from_scene(scene);
        let mut state = before;

        egui::Window::new("Controls")
            .default_pos([12.0, 12.0])
            .resizable(false)
            .show(ctx, |ui| {
                shape_selector(ui, &mut state);
                ui.separator();

                egui::CollapsingHeader::new("Light")
                    .default_open(true)
                    .show(ui, |ui| {
                        let controls = light_position_controls();
                        let axes = [
                            &mut state.light_position.x,
                            &mut state.light_position.y,
                            &mut state.light_position.z,
                        ];
                        for (control, value) in controls.into_iter().zip(axes) {
                            ui.add(egui::Slider::new(value, control.range).text(control.label));
                        }
                    });

                egui::CollapsingHeader::new("MeshPhongMaterial")
                    .default_open(true)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            egui::color_picker::color_edit_button_rgb(ui, &mut state.color);
                            ui.label("color");
                        });
                        ui.horizontal(|ui| {
                            egui::color_picker::color_edit_button_rgb(ui, &mut state.emissive);
                            ui.label("emissive");
                        });
                        let control = shininess_control();
                        ui.add(
                            egui::Slider::new(&mut state.shininess, control.range)
                                .text(control.label),
                        );
                    });

                ui.separator();
                ui.small("F1: Toggle Panel | LMB: Orbit | RMB: Pan | Wheel: Zoom");
            });

        let changes = state.changes_from(&before);
        for change in &changes {
            tracing::debug!(?change, "panel edit");
        }
        changes
    }
}

fn shape_selector(ui: &mut egui::Ui, state: &mut PanelState) {
    egui::ComboBox::from_label("shape")
        .selected_text(state.params.shape.label())
        .show_ui(ui, |ui| {
            for kind in ShapeKind::ALL {
                ui.selectable_value(&mut state.params.shape, kind, kind.label());
            }
        });
}
