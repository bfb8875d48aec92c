//! CPU tessellation of the primitive geometries.
//!
//! All meshes are indexed triangle lists with counter-clockwise front faces
//! and unit-length outward normals.

use glam::Vec3;
use primview_scene::GeometryDesc;
use std::f32::consts::{PI, TAU};

/// Indexed triangle mesh on the CPU, ready for upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, position: Vec3, normal: Vec3) {
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
    }

    /// Axis-aligned bounds as `(min, max)`; `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// Tessellate a geometry description.
pub fn tessellate(desc: &GeometryDesc) -> MeshBuffers {
    match *desc {
        GeometryDesc::Box {
            width,
            height,
            depth,
            segments,
        } => box_mesh(Vec3::new(width, height, depth), segments),
        GeometryDesc::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere_mesh(radius, width_segments, height_segments),
        GeometryDesc::TorusKnot {
            radius,
            tube,
            tubular_segments,
            radial_segments,
            p,
            q,
        } => torus_knot_mesh(radius, tube, tubular_segments, radial_segments, p, q),
    }
}

/// Box centered at the origin with `segments` subdivisions along each edge.
fn box_mesh(size: Vec3, segments: u32) -> MeshBuffers {
    let segs = segments.max(1);
    let per_face = ((segs + 1) * (segs + 1)) as usize;
    let mut mesh = MeshBuffers::with_capacity(per_face * 6, (segs * segs * 6 * 6) as usize);

    // (outward normal, u axis, v axis) with u x v == normal.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    for (normal, u_axis, v_axis) in faces {
        let center = normal * size * 0.5;
        let u = u_axis * size;
        let v = v_axis * size;
        let base = mesh.vertex_count() as u32;

        for iy in 0..=segs {
            let t = iy as f32 / segs as f32 - 0.5;
            for ix in 0..=segs {
                let s = ix as f32 / segs as f32 - 0.5;
                mesh.push(center + u * s + v * t, normal);
            }
        }

        let row = segs + 1;
        for iy in 0..segs {
            for ix in 0..segs {
                let a = base + iy * row + ix;
                let b = a + 1;
                let c = a + row;
                let d = c + 1;
                mesh.indices.extend_from_slice(&[a, b, d, a, d, c]);
            }
        }
    }

    mesh
}

/// UV sphere; pole rows emit a single triangle per cell.
fn sphere_mesh(radius: f32, width_segments: u32, height_segments: u32) -> MeshBuffers {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);
    let mut mesh = MeshBuffers::with_capacity(
        ((ws + 1) * (hs + 1)) as usize,
        (ws * (hs * 2 - 2) * 3) as usize,
    );

    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();
            let normal = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            mesh.push(normal * radius, normal.normalize_or_zero());
        }
    }

    let row = ws + 1;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    mesh
}

/// Point on the (p, q) torus knot curve at parameter `u`.
fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let (su, cu) = u.sin_cos();
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * cu,
        radius * (2.0 + cs) * su * 0.5,
        radius * qu_over_p.sin() * 0.5,
    )
}

/// Tube of radius `tube` swept along a (p, q) torus knot.
fn torus_knot_mesh(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> MeshBuffers {
    let tubular = tubular_segments.max(3);
    let radial = radial_segments.max(3);
    let (pf, qf) = (p.max(1) as f32, q.max(1) as f32);
    let mut mesh = MeshBuffers::with_capacity(
        ((tubular + 1) * (radial + 1)) as usize,
        (tubular * radial * 6) as usize,
    );

    for i in 0..=tubular {
        let u = i as f32 / tubular as f32 * pf * TAU;
        let p1 = knot_curve(u, pf, qf, radius);
        let p2 = knot_curve(u + 0.01, pf, qf, radius);

        // Frame along the curve: tangent, then binormal and normal.
        let tangent = p2 - p1;
        let binormal = tangent.cross(p2 + p1);
        let normal = binormal.cross(tangent).normalize();
        let binormal = binormal.normalize();

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            let (sv, cv) = v.sin_cos();
            let offset = normal * (-tube * cv) + binormal * (tube * sv);
            mesh.push(p1 + offset, offset.normalize_or_zero());
        }
    }

    let row = radial + 1;
    for j in 1..=tubular {
        for i in 1..=radial {
            let a = row * (j - 1) + (i - 1);
            let b = row * j + (i - 1);
            let c = row * j + i;
            let d = row * (j - 1) + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    mesh
}
