use primview_common::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the three primitives is shown.
///
/// Visibility is a single selection rather than three flags, so the set can
/// never be all-hidden or show two meshes at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Cube,
    Sphere,
    Knot,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Cube, ShapeKind::Sphere, ShapeKind::Knot];

    /// Option label shown in the debug panel.
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Cube => "Cube",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Knot => "Knot",
        }
    }

    fn index(self) -> usize {
        match self {
            ShapeKind::Cube => 0,
            ShapeKind::Sphere => 1,
            ShapeKind::Knot => 2,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shape {0:?}, expected one of cube, sphere, knot")]
pub struct UnknownShape(pub String);

impl FromStr for ShapeKind {
    type Err = UnknownShape;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownShape(s.to_string()))
    }
}

/// Parametric description of a mesh; tessellated by the render crates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryDesc {
    Box {
        width: f32,
        height: f32,
        depth: f32,
        segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    TorusKnot {
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    },
}

impl GeometryDesc {
    /// Geometry used for `kind` in the default scene.
    pub fn for_shape(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Cube => GeometryDesc::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
                segments: 128,
            },
            ShapeKind::Sphere => GeometryDesc::Sphere {
                radius: 1.0,
                width_segments: 32,
                height_segments: 32,
            },
            ShapeKind::Knot => GeometryDesc::TorusKnot {
                radius: 0.5,
                tube: 0.1,
                tubular_segments: 100,
                radial_segments: 16,
                p: 2,
                q: 3,
            },
        }
    }
}

/// A primitive mesh node. All meshes share the scene's one material.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub id: NodeId,
    pub kind: ShapeKind,
    pub geometry: GeometryDesc,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            geometry: GeometryDesc::for_shape(kind),
            cast_shadow: true,
            receive_shadow: true,
        }
    }
}

/// The cube, sphere and knot, with exactly one selected for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSet {
    meshes: [Mesh; 3],
    selected: ShapeKind,
}

impl Default for PrimitiveSet {
    fn default() -> Self {
        Self::new(ShapeKind::default())
    }
}

impl PrimitiveSet {
    pub fn new(selected: ShapeKind) -> Self {
        Self {
            meshes: ShapeKind::ALL.map(Mesh::new),
            selected,
        }
    }

    pub fn selected(&self) -> ShapeKind {
        self.selected
    }

    /// Show `kind` and hide the other two. Returns whether the selection changed.
    pub fn select(&mut self, kind: ShapeKind) -> bool {
        let changed = self.selected != kind;
        self.selected = kind;
        changed
    }

    pub fn is_visible(&self, kind: ShapeKind) -> bool {
        self.selected == kind
    }

    pub fn get(&self, kind: ShapeKind) -> &Mesh {
        &self.meshes[kind.index()]
    }

    pub fn visible_mesh(&self) -> &Mesh {
        self.get(self.selected)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible_count(set: &PrimitiveSet) -> usize {
        ShapeKind::ALL.iter().filter(|k| set.is_visible(**k)).count()
    }

    #[test]
    fn cube_is_visible_by_default() {
        let set = PrimitiveSet::default();
        assert!(set.is_visible(ShapeKind::Cube));
        assert!(!set.is_visible(ShapeKind::Sphere));
        assert!(!set.is_visible(ShapeKind::Knot));
    }

    #[test]
    fn exactly_one_visible_after_any_selection() {
        let mut set = PrimitiveSet::default();
        for kind in [
            ShapeKind::Sphere,
            ShapeKind::Knot,
            ShapeKind::Knot,
            ShapeKind::Cube,
            ShapeKind::Sphere,
        ] {
            set.select(kind);
            assert_eq!(visible_count(&set), 1);
            assert_eq!(set.visible_mesh().kind, kind);
        }
    }

    #[test]
    fn select_reports_change() {
        let mut set = PrimitiveSet::default();
        assert!(!set.select(ShapeKind::Cube));
        assert!(set.select(ShapeKind::Sphere));
    }

    #[test]
    fn meshes_are_indexed_by_kind() {
        let set = PrimitiveSet::default();
        for kind in ShapeKind::ALL {
            assert_eq!(set.get(kind).kind, kind);
            assert!(set.get(kind).cast_shadow);
            assert!(set.get(kind).receive_shadow);
        }
        assert_eq!(set.iter().count(), 3);
    }

    #[test]
    fn parse_shape_names() {
        assert_eq!("cube".parse::<ShapeKind>(), Ok(ShapeKind::Cube));
        assert_eq!("Sphere".parse::<ShapeKind>(), Ok(ShapeKind::Sphere));
        assert_eq!(" KNOT ".parse::<ShapeKind>(), Ok(ShapeKind::Knot));
        assert!("teapot".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn knot_geometry_matches_defaults() {
        match GeometryDesc::for_shape(ShapeKind::Knot) {
            GeometryDesc::TorusKnot { p, q, radius, .. } => {
                assert_eq!((p, q), (2, 3));
                assert_eq!(radius, 0.5);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }
}
