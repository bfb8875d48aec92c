//! Developer tooling: the debug panel.
//!
//! # Invariants
//! - The panel reports edits as `SceneChange`s; it never owns scene state.
//! - Control ranges are the same ones `Scene::apply` clamps to.

mod controls;
mod panel;

pub use controls::{
    PanelParams, PanelState, SliderControl, light_position_controls, shape_options,
    shininess_control,
};
pub use panel::DebugPanel;
