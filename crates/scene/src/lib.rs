//! Scene model: everything the renderer draws and the debug panel edits.
//!
//! # Invariants
//! - Objects are added once at construction and never removed.
//! - Exactly one primitive is visible at any time.
//! - All mutations flow through [`Scene::apply`].

mod camera;
mod light;
mod material;
mod primitive;
mod scene;

pub use camera::PerspectiveCamera;
pub use light::{HemisphereLight, PointLight};
pub use material::PhongMaterial;
pub use primitive::{GeometryDesc, Mesh, PrimitiveSet, ShapeKind, UnknownShape};
pub use scene::{LIGHT_POSITION_RANGE, NodeRef, SHININESS_RANGE, Scene, SceneChange};
