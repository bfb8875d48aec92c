//! Camera input: pointer events become orbit gestures, gestures drive a
//! damped orbit controller.
//!
//! # Invariants
//! - The controller only moves the camera inside [`OrbitControls::update`].
//! - Gestures accumulate; nothing is lost between two updates.

pub mod gesture;
mod orbit;
mod pointer;

pub use gesture::OrbitGesture;
pub use orbit::OrbitControls;
pub use pointer::{PointerButton, PointerTracker};
