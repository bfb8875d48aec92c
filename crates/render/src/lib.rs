//! Rendering adapter: renderer-agnostic interface and shared geometry.
//!
//! # Invariants
//! - Renderers never mutate the scene or the camera.
//! - Only the visible primitive is drawn.
//!
//! The [`Renderer`] trait is what the viewer runtime drives. The debug text
//! renderer implements it without a GPU so the frame loop can run headless
//! and under test; the wgpu backend lives in its own crate.

pub mod geometry;
mod renderer;

pub use geometry::{MeshBuffers, tessellate};
pub use renderer::{DebugTextRenderer, Renderer};
