//! wgpu render backend for the primitive viewer.
//!
//! Draws the visible primitive with a Blinn-Phong material lit by the scene's
//! hemisphere and point lights, multisampled and tone mapped.
//!
//! # Invariants
//! - Renderer never mutates the scene or the camera.
//! - Only the selected primitive is submitted for drawing.
//! - Depth and MSAA targets always match the configured surface size.
//! - The shadow map is cleared every frame; the visible mesh is drawn into it
//!   only when both it and the point light cast shadows.

mod context;
mod gpu;
mod shaders;
mod shadow;

pub use context::{GpuContext, GpuError};
pub use gpu::{Frame, WgpuRenderer};
