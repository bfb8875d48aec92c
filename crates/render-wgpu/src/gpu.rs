use crate::context::GpuContext;
use crate::shaders;
use crate::shadow::{self, SHADOW_BIAS, ShadowMap};
use bytemuck::{Pod, Zeroable};
use primview_common::SurfaceSize;
use primview_render::{MeshBuffers, Renderer, tessellate};
use primview_scene::{PerspectiveCamera, Scene, ShapeKind};
use wgpu::util::DeviceExt;

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Tone mapping exposure.
const EXPOSURE: f32 = 1.0;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    sky: [f32; 4],
    ground: [f32; 4],
    light_color: [f32; 4],
    light_pos: [f32; 4],
    params: [f32; 4],
    diffuse: [f32; 4],
    emissive: [f32; 4],
    specular: [f32; 4],
}

impl Globals {
    fn new(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let hemi = scene.hemisphere_light();
        let point = scene.point_light();
        let mat = scene.material();
        let rgbw = |c: primview_common::Color, w: f32| [c.r, c.g, c.b, w];
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_pos: camera.position().extend(1.0).to_array(),
            sky: rgbw(hemi.sky_color, hemi.intensity),
            ground: rgbw(hemi.ground_color, 1.0),
            light_color: rgbw(point.color, point.intensity),
            light_pos: point.position.extend(point.distance).to_array(),
            params: [
                point.decay,
                EXPOSURE,
                if shadow::receives(scene) { 1.0 } else { 0.0 },
                SHADOW_BIAS,
            ],
            diffuse: rgbw(mat.color, 1.0),
            emissive: rgbw(mat.emissive, 1.0),
            specular: rgbw(mat.specular, mat.shininess),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
}

struct GpuMesh {
    kind: ShapeKind,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, kind: ShapeKind, mesh: &MeshBuffers) -> Self {
        let vertices: Vec<Vertex> = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .map(|(position, normal)| Vertex {
                position: *position,
                normal: *normal,
            })
            .collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{kind}_vertex_buffer").as_str()),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(format!("{kind}_index_buffer").as_str()),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            kind,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// A rendered frame waiting to be presented. Overlays may draw onto `view`
/// before [`present`](Self::present).
pub struct Frame {
    pub texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl Frame {
    pub fn present(self) {
        self.texture.present();
    }
}

/// wgpu-based scene renderer. Owns the GPU context for its window.
pub struct WgpuRenderer {
    context: GpuContext,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    depth_texture: wgpu::TextureView,
    msaa_texture: Option<wgpu::TextureView>,
    shadow: ShadowMap,
}

impl WgpuRenderer {
    /// Build the pipeline and upload all three primitives from `scene`.
    pub fn new(context: GpuContext, scene: &Scene) -> Self {
        let device = &context.device;
        let format = context.format();
        let sample_count = context.sample_count();

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_buffer"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let shadow = ShadowMap::new(device, std::mem::size_of::<Vertex>() as u64);

        let uniform_entry = |binding, visibility| wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2Array,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
                uniform_entry(3, wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow.array_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: shadow.faces_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("phong_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("phong_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::PHONG_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("phong_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        let meshes = scene
            .primitives()
            .iter()
            .map(|mesh| {
                let buffers = tessellate(&mesh.geometry);
                tracing::debug!(
                    kind = %mesh.kind,
                    vertices = buffers.vertex_count(),
                    triangles = buffers.triangle_count(),
                    "uploaded primitive"
                );
                GpuMesh::upload(device, mesh.kind, &buffers)
            })
            .collect();

        let size = context.size();
        let depth_texture = create_depth_texture(device, size, sample_count);
        let msaa_texture = create_msaa_texture(device, format, size, sample_count);

        Self {
            context,
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            meshes,
            depth_texture,
            msaa_texture,
            shadow,
        }
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    fn acquire(&self) -> Option<wgpu::SurfaceTexture> {
        match self.context.surface.get_current_texture() {
            Ok(texture) => Some(texture),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated, reconfiguring");
                self.context.reconfigure();
                None
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("timed out acquiring surface texture");
                None
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                None
            }
        }
    }
}

impl Renderer for WgpuRenderer {
    type Output = Option<Frame>;

    fn resize(&mut self, size: SurfaceSize) {
        self.context.resize(size);
        let size = self.context.size();
        let device = &self.context.device;
        let samples = self.context.sample_count();
        self.depth_texture = create_depth_texture(device, size, samples);
        self.msaa_texture = create_msaa_texture(device, self.context.format(), size, samples);
        tracing::debug!(%size, "render targets resized");
    }

    /// Render one frame: refresh the point-light shadow map, then clear to
    /// the background and draw the visible primitive.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Option<Frame> {
        let texture = self.acquire()?;
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let device = &self.context.device;
        let queue = &self.context.queue;
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Globals::new(scene, camera)),
        );
        self.shadow.update(queue, scene.point_light().position);

        let visible = scene.primitives().selected();
        let mesh = self.meshes.iter().find(|m| m.kind == visible);

        let (color_view, resolve_target) = match &self.msaa_texture {
            Some(msaa) => (msaa, Some(&view)),
            None => (&view, None),
        };
        let bg = scene.background;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        let caster = mesh
            .filter(|_| shadow::casts(scene))
            .map(|m| (&m.vertex_buffer, &m.index_buffer, m.index_count));
        self.shadow.render(&mut encoder, caster);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: bg.r as f64,
                            g: bg.g as f64,
                            b: bg.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let Some(mesh) = mesh {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        Some(Frame { texture, view })
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    size: SurfaceSize,
    sample_count: u32,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

fn create_msaa_texture(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    size: SurfaceSize,
    sample_count: u32,
) -> Option<wgpu::TextureView> {
    if sample_count <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("msaa_texture"),
        size: wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&Default::default()))
}
