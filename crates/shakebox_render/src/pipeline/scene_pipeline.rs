//! Scene pipeline: gradient skybox, lit instanced objects and the boundary
//! wireframe, drawn in that order into one render pass.

use glam::{Mat4, Vec3};
use shakebox_physics::ShapeKind;
use wgpu::util::DeviceExt;

use super::types::{InstanceRaw, SceneUniforms, Vertex};
use crate::error::{validated, RenderError};
use crate::mesh::{skybox_positions, GpuMesh, MeshData, ROUND_SEGMENTS, SPHERE_DETAIL};
use crate::renderable::ObjectInstances;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_INSTANCE_CAPACITY: usize = 64;

/// Tessellation used when building the shape meshes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshDetail {
    pub sphere_latitudes: u32,
    pub sphere_longitudes: u32,
    pub round_segments: u32,
}

impl Default for MeshDetail {
    fn default() -> Self {
        Self {
            sphere_latitudes: SPHERE_DETAIL.0,
            sphere_longitudes: SPHERE_DETAIL.1,
            round_segments: ROUND_SEGMENTS,
        }
    }
}

pub struct ScenePipeline {
    object_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    skybox_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// One mesh per kind, in `ShapeKind::ALL` order
    meshes: [GpuMesh; 4],
    wire_box: GpuMesh,
    skybox_buffer: wgpu::Buffer,
    skybox_vertex_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    wire_instance_buffer: wgpu::Buffer,
    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl ScenePipeline {
    /// Build all pipelines and upload the static meshes
    ///
    /// Shader compilation and pipeline validation errors are returned
    /// rather than left to the device's uncaptured-error handler.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        detail: MeshDetail,
    ) -> Result<Self, RenderError> {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let scene_shader = validated(device, "scene.wgsl", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Scene Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
            })
        })?;
        let skybox_shader = validated(device, "skybox.wgsl", || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Skybox Shader"),
                source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/skybox.wgsl").into()),
            })
        })?;

        let object_pipeline = validated(device, "Object Pipeline", || {
            create_pipeline(
                device,
                &PipelineDesc {
                    label: "Object Pipeline",
                    layout: &pipeline_layout,
                    shader: &scene_shader,
                    fragment_entry: "fs_main",
                    buffers: &[Vertex::layout(), InstanceRaw::layout()],
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    depth_write: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    format: surface_format,
                },
            )
        })?;

        let line_pipeline = validated(device, "Line Pipeline", || {
            create_pipeline(
                device,
                &PipelineDesc {
                    label: "Line Pipeline",
                    layout: &pipeline_layout,
                    shader: &scene_shader,
                    fragment_entry: "fs_line",
                    buffers: &[Vertex::layout(), InstanceRaw::layout()],
                    topology: wgpu::PrimitiveTopology::LineList,
                    depth_write: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    format: surface_format,
                },
            )
        })?;

        let skybox_pipeline = validated(device, "Skybox Pipeline", || {
            create_pipeline(
                device,
                &PipelineDesc {
                    label: "Skybox Pipeline",
                    layout: &pipeline_layout,
                    shader: &skybox_shader,
                    fragment_entry: "fs_main",
                    buffers: &[skybox_buffer_layout()],
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    depth_write: false,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    format: surface_format,
                },
            )
        })?;

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let meshes = ShapeKind::ALL.map(|kind| {
            let data = match kind {
                ShapeKind::Cube => MeshData::cube(),
                ShapeKind::Sphere => {
                    MeshData::sphere(detail.sphere_latitudes, detail.sphere_longitudes)
                }
                ShapeKind::Cone => MeshData::cone(detail.round_segments),
                ShapeKind::Cylinder => MeshData::cylinder(detail.round_segments),
            };
            GpuMesh::upload(device, kind.label(), &data)
        });
        let wire_box = GpuMesh::upload(device, "Boundary", &MeshData::wire_box());

        let sky = skybox_positions();
        let skybox_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Vertex Buffer"),
            contents: bytemuck::cast_slice(&sky),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = create_instance_buffer(device, INITIAL_INSTANCE_CAPACITY);
        let wire_instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Boundary Instance Buffer"),
            contents: bytemuck::bytes_of(&InstanceRaw::from_matrix(Mat4::IDENTITY, [1.0; 3])),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        log::debug!(
            "Scene pipeline ready ({} sphere indices, {} round segments)",
            meshes[1].index_count,
            detail.round_segments
        );

        Ok(Self {
            object_pipeline,
            line_pipeline,
            skybox_pipeline,
            uniform_buffer,
            bind_group,
            meshes,
            wire_box,
            skybox_buffer,
            skybox_vertex_count: sky.len() as u32,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            wire_instance_buffer,
            depth_texture: None,
            depth_size: (0, 0),
        })
    }

    /// Ensure depth texture exists and is the right size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            self.depth_texture =
                Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    pub fn update_uniforms(&self, queue: &wgpu::Queue, uniforms: &SceneUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Scale the boundary wireframe to a box of half-extent `boundary_size`
    pub fn set_boundary(&self, queue: &wgpu::Queue, boundary_size: f32) {
        let model = Mat4::from_scale(Vec3::splat(boundary_size * 2.0));
        let instance = InstanceRaw::from_matrix(model, [1.0; 3]);
        queue.write_buffer(&self.wire_instance_buffer, 0, bytemuck::bytes_of(&instance));
    }

    /// Upload this frame's instances, growing the buffer when needed
    pub fn upload_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &ObjectInstances,
    ) {
        let needed = instances.len();
        if needed > self.instance_capacity {
            let capacity = needed.next_power_of_two();
            log::debug!("Growing instance buffer to {} instances", capacity);
            self.instance_buffer = create_instance_buffer(device, capacity);
            self.instance_capacity = capacity;
        }
        if needed > 0 {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(instances.instances()),
            );
        }
    }

    /// Record the scene pass
    ///
    /// `instances` must have been uploaded with [`Self::upload_instances`].
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear_color: wgpu::Color,
        instances: &ObjectInstances,
    ) -> Result<(), RenderError> {
        let depth_view = self.depth_texture.as_ref().ok_or_else(|| {
            RenderError::Other("depth texture not created before render".to_string())
        })?;

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_bind_group(0, &self.bind_group, &[]);

        // Skybox
        pass.set_pipeline(&self.skybox_pipeline);
        pass.set_vertex_buffer(0, self.skybox_buffer.slice(..));
        pass.draw(0..self.skybox_vertex_count, 0..1);

        // Objects
        if !instances.is_empty() {
            pass.set_pipeline(&self.object_pipeline);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for (kind, mesh) in ShapeKind::ALL.iter().zip(&self.meshes) {
                let range = instances.range(*kind);
                if range.is_empty() {
                    continue;
                }
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, range);
            }
        }

        // Boundary wireframe
        pass.set_pipeline(&self.line_pipeline);
        pass.set_vertex_buffer(0, self.wire_box.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.wire_instance_buffer.slice(..));
        pass.set_index_buffer(self.wire_box.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.wire_box.index_count, 0, 0..1);

        Ok(())
    }
}

struct PipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    fragment_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    depth_write: bool,
    depth_compare: wgpu::CompareFunction,
    format: wgpu::TextureFormat,
}

fn create_pipeline(device: &wgpu::Device, desc: &PipelineDesc) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: desc.buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Drawn double-sided; the skybox is seen from inside
            cull_mode: None,
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: desc.depth_write,
            depth_compare: desc.depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn skybox_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &ATTRIBUTES,
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Instance Buffer"),
        size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
