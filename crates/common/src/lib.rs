//! Shared value types for the viewer crates.
//!
//! # Invariants
//! - A `Viewport` always has finite, strictly positive dimensions.
//! - `Color` components are stored in linear space.

mod color;
mod types;
mod viewport;

pub use color::Color;
pub use types::NodeId;
pub use viewport::{SurfaceSize, Viewport, ViewportError};
