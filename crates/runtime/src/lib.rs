//! Viewer runtime: setup, the resize handler and the render loop.
//!
//! Hosts (the desktop app, the headless CLI) own the window or surface and
//! a [`Renderer`](primview_render::Renderer); the [`Viewer`] owns everything
//! else and is driven by the host's events.
//!
//! # Invariants
//! - Each frame runs clock delta, then controls update, then exactly one render.
//! - Camera aspect equals viewport width / height after every resize.
//! - Resizing twice with the same viewport changes nothing.

mod clock;
mod config;
mod viewer;

pub use clock::Clock;
pub use config::{ConfigError, ViewerConfig};
pub use viewer::{LoopState, Viewer, ViewerError};
