//! Omnidirectional shadow map for the point light.
//!
//! The light's surroundings are rendered into six layers of a depth array,
//! one 90° perspective per axis direction. The fragment shader picks the
//! layer by the major axis of the light-to-fragment vector and reprojects
//! with the same matrix, so lookups never depend on cube-face conventions.

use crate::shaders;
use glam::{Mat4, Vec3};
use primview_scene::Scene;
use std::f32::consts::FRAC_PI_2;

pub(crate) const SHADOW_MAP_SIZE: u32 = 1024;
pub(crate) const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// Clip planes of each face camera.
pub(crate) const SHADOW_NEAR: f32 = 0.5;
pub(crate) const SHADOW_FAR: f32 = 500.0;
/// Depth bias subtracted from the reference depth before comparison.
pub(crate) const SHADOW_BIAS: f32 = 0.0005;

/// Face directions and up vectors, in layer order +X, -X, +Y, -Y, +Z, -Z.
const FACES: [(Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Y),
    (Vec3::NEG_X, Vec3::NEG_Y),
    (Vec3::Y, Vec3::Z),
    (Vec3::NEG_Y, Vec3::NEG_Z),
    (Vec3::Z, Vec3::NEG_Y),
    (Vec3::NEG_Z, Vec3::NEG_Y),
];

/// View-projection of each face camera for a light at `position`.
pub(crate) fn face_view_projections(position: Vec3) -> [Mat4; 6] {
    let projection = Mat4::perspective_rh(FRAC_PI_2, 1.0, SHADOW_NEAR, SHADOW_FAR);
    FACES.map(|(dir, up)| projection * Mat4::look_to_rh(position, dir, up))
}

/// The visible mesh is drawn into the shadow map.
pub(crate) fn casts(scene: &Scene) -> bool {
    scene.point_light().cast_shadow && scene.primitives().visible_mesh().cast_shadow
}

/// The visible mesh is shaded with the shadow map.
pub(crate) fn receives(scene: &Scene) -> bool {
    scene.point_light().cast_shadow && scene.primitives().visible_mesh().receive_shadow
}

/// GPU resources of the point-light shadow pass.
pub(crate) struct ShadowMap {
    pipeline: wgpu::RenderPipeline,
    layers: Vec<wgpu::TextureView>,
    face_buffers: Vec<wgpu::Buffer>,
    face_bind_groups: Vec<wgpu::BindGroup>,
    pub(crate) array_view: wgpu::TextureView,
    pub(crate) sampler: wgpu::Sampler,
    /// All six matrices, read by the lighting shader.
    pub(crate) faces_buffer: wgpu::Buffer,
}

impl ShadowMap {
    pub(crate) fn new(device: &wgpu::Device, vertex_stride: u64) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("point_shadow_texture"),
            size: wgpu::Extent3d {
                width: SHADOW_MAP_SIZE,
                height: SHADOW_MAP_SIZE,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let array_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("point_shadow_array_view"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            aspect: wgpu::TextureAspect::DepthOnly,
            ..Default::default()
        });
        let layers = (0..6)
            .map(|layer| {
                texture.create_view(&wgpu::TextureViewDescriptor {
                    label: Some("point_shadow_layer_view"),
                    dimension: Some(wgpu::TextureViewDimension::D2),
                    aspect: wgpu::TextureAspect::DepthOnly,
                    base_array_layer: layer,
                    array_layer_count: Some(1),
                    ..Default::default()
                })
            })
            .collect();

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("point_shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let faces_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point_shadow_faces_buffer"),
            size: 6 * std::mem::size_of::<[[f32; 4]; 4]>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let face_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_face_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let face_buffers: Vec<wgpu::Buffer> = (0..6)
            .map(|_| {
                device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("shadow_face_buffer"),
                    size: std::mem::size_of::<[[f32; 4]; 4]>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                })
            })
            .collect();
        let face_bind_groups = face_buffers
            .iter()
            .map(|buffer| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("shadow_face_bind_group"),
                    layout: &face_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                })
            })
            .collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow_pipeline_layout"),
            bind_group_layouts: &[&face_layout],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shadow_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SHADOW_SHADER.into()),
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shadow"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: vertex_stride,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: SHADOW_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            layers,
            face_buffers,
            face_bind_groups,
            array_view,
            sampler,
            faces_buffer,
        }
    }

    /// Upload the face matrices for a light at `position`.
    pub(crate) fn update(&self, queue: &wgpu::Queue, position: Vec3) {
        let matrices = face_view_projections(position).map(|m| m.to_cols_array_2d());
        queue.write_buffer(&self.faces_buffer, 0, bytemuck::cast_slice(&matrices));
        for (buffer, matrix) in self.face_buffers.iter().zip(&matrices) {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(matrix));
        }
    }

    /// Clear every layer and, when `caster` is given, draw it into each one.
    pub(crate) fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        caster: Option<(&wgpu::Buffer, &wgpu::Buffer, u32)>,
    ) {
        for (layer, bind_group) in self.layers.iter().zip(&self.face_bind_groups) {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: layer,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            if let Some((vertices, indices, count)) = caster {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, bind_group, &[]);
                pass.set_vertex_buffer(0, vertices.slice(..));
                pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..count, 0, 0..1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use primview_scene::{SceneChange, ShapeKind};

    /// Layer holding the direction `d` from the light, as `shadow_face`
    /// picks it in the shader.
    fn face_for(d: Vec3) -> usize {
        let a = d.abs();
        if a.x >= a.y && a.x >= a.z {
            if d.x > 0.0 { 0 } else { 1 }
        } else if a.y >= a.z {
            if d.y > 0.0 { 2 } else { 3 }
        } else if d.z > 0.0 {
            4
        } else {
            5
        }
    }

    fn project(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * p.extend(1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn face_axis_projects_to_layer_center() {
        let light = Vec3::new(0.5, 0.7, 1.0);
        let faces = face_view_projections(light);
        for (i, (dir, _)) in FACES.iter().enumerate() {
            let ndc = project(faces[i], light + *dir * 2.0);
            assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4, "face {i}: {ndc}");
            assert!(ndc.z > 0.0 && ndc.z < 1.0);
            assert_eq!(face_for(*dir), i);
        }
    }

    #[test]
    fn selected_face_contains_the_point() {
        let light = Vec3::new(-1.0, 0.5, 0.3);
        let faces = face_view_projections(light);
        let points = [
            Vec3::new(0.3, 0.2, -0.4),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.0, 1.9, 0.0),
            Vec3::new(-1.2, 0.4, -1.5),
        ];
        for p in points {
            let ndc = project(faces[face_for(p - light)], p);
            assert!(ndc.x.abs() <= 1.0 + 1e-5 && ndc.y.abs() <= 1.0 + 1e-5, "{p}: {ndc}");
            assert!(ndc.z > 0.0 && ndc.z < 1.0);
        }
    }

    #[test]
    fn nearer_occluder_has_smaller_depth() {
        // The knot's tube can sit between the light and another tube segment.
        let light = Vec3::new(0.0, 0.0, 2.0);
        let faces = face_view_projections(light);
        let layer = face_for(Vec3::NEG_Z);
        let near = project(faces[layer], Vec3::new(0.0, 0.0, 0.5));
        let far = project(faces[layer], Vec3::new(0.0, 0.0, -0.5));
        assert!(near.z + SHADOW_BIAS < far.z);
    }

    #[test]
    fn default_scene_casts_and_receives() {
        let mut scene = Scene::default();
        assert!(casts(&scene));
        assert!(receives(&scene));
        scene.apply(SceneChange::SelectShape(ShapeKind::Knot));
        assert!(casts(&scene));
        assert!(receives(&scene));
    }
}
