use super::helpers::{self, DepthMode, PipelineSpec};
use crate::showcase::glb::{MeshData, ModelVertex};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

impl ModelVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3
    ];

    pub(crate) fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) light_dir: [f32; 4],
    pub(crate) light: [f32; 4],
}

impl SceneUniforms {
    pub(crate) fn new(view_proj: Mat4, light_position: Vec3, ambient: f32, directional: f32) -> Self {
        let dir = light_position.normalize_or_zero();
        Self {
            view_proj: helpers::mat4_cols(view_proj),
            light_dir: [dir.x, dir.y, dir.z, 0.0],
            light: [ambient, directional, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct InstanceUniforms {
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) normal: [[f32; 4]; 4],
    pub(crate) color: [f32; 4],
}

impl InstanceUniforms {
    pub(crate) fn new(model: Mat4, color: [f32; 4]) -> Self {
        Self {
            model: helpers::mat4_cols(model),
            normal: helpers::mat4_cols(model.inverse().transpose()),
            color,
        }
    }
}

pub(crate) struct GpuPrimitive {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    line_buffer: wgpu::Buffer,
    line_count: u32,
    pub(crate) color: [f32; 4],
}

/// GPU copy of one GLB mesh, shared by every node that references it.
pub(crate) struct GpuMesh {
    pub(crate) primitives: Vec<GpuPrimitive>,
}

pub(crate) fn upload_mesh(device: &wgpu::Device, mesh: &MeshData) -> GpuMesh {
    let primitives = mesh
        .primitives
        .iter()
        .map(|p| {
            let lines = p.edge_indices();
            GpuPrimitive {
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_vertices"),
                    contents: bytemuck::cast_slice(&p.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_indices"),
                    contents: bytemuck::cast_slice(&p.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: p.indices.len() as u32,
                line_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_edges"),
                    contents: bytemuck::cast_slice(&lines),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                line_count: lines.len() as u32,
                color: p.base_color,
            }
        })
        .collect();
    GpuMesh { primitives }
}

/// Lit and wireframe pipelines plus a growable dynamic-offset buffer holding
/// one [`InstanceUniforms`] slot per drawn primitive.
pub(crate) struct MeshRenderer {
    lit_pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    instance_bgl: wgpu::BindGroupLayout,
    instance_buffer: wgpu::Buffer,
    instance_bind_group: wgpu::BindGroup,
    slot_stride: u64,
    capacity: usize,
    staging: Vec<u8>,
}

const INSTANCE_SIZE: u64 = std::mem::size_of::<InstanceUniforms>() as u64;
const INITIAL_SLOTS: usize = 64;

impl MeshRenderer {
    pub(crate) fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("meshes_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::MESHES_WGSL.into()),
        });
        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_scene_bgl"),
            entries: &[helpers::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                None,
            )],
        });
        let instance_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_instance_bgl"),
            entries: &[helpers::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
                Some(INSTANCE_SIZE),
            )],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pl"),
            bind_group_layouts: &[&scene_bgl, &instance_bgl],
            push_constant_ranges: &[],
        });
        let make = |label: &str, topology: wgpu::PrimitiveTopology| {
            helpers::make_scene_pipeline(
                device,
                PipelineSpec {
                    label,
                    layout: &pl,
                    shader: &shader,
                    vs_entry: "vs_mesh",
                    fs_entry: "fs_mesh",
                    buffers: &[ModelVertex::desc()],
                    topology,
                    color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    depth: DepthMode::Write,
                },
            )
        };
        let lit_pipeline = make("mesh_lit_pipeline", wgpu::PrimitiveTopology::TriangleList);
        let wire_pipeline = make("mesh_wire_pipeline", wgpu::PrimitiveTopology::LineList);

        let scene_buffer =
            helpers::uniform_buffer(device, "mesh_scene_uniforms", std::mem::size_of::<SceneUniforms>() as u64);
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let align = device.limits().min_uniform_buffer_offset_alignment as u64;
        let slot_stride = INSTANCE_SIZE.div_ceil(align) * align;
        let (instance_buffer, instance_bind_group) =
            Self::create_instance_slots(device, &instance_bgl, slot_stride, INITIAL_SLOTS);

        Self {
            lit_pipeline,
            wire_pipeline,
            scene_buffer,
            scene_bind_group,
            instance_bgl,
            instance_buffer,
            instance_bind_group,
            slot_stride,
            capacity: INITIAL_SLOTS,
            staging: Vec::new(),
        }
    }

    fn create_instance_slots(
        device: &wgpu::Device,
        bgl: &wgpu::BindGroupLayout,
        stride: u64,
        slots: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = helpers::uniform_buffer(device, "mesh_instance_uniforms", stride * slots as u64);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_instance_bg"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(INSTANCE_SIZE),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// Upload the scene block and every instance slot for this frame.
    pub(crate) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        scene: &SceneUniforms,
        instances: &[InstanceUniforms],
    ) {
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(scene));
        if instances.is_empty() {
            return;
        }
        if instances.len() > self.capacity {
            let slots = instances.len().next_power_of_two();
            (self.instance_buffer, self.instance_bind_group) =
                Self::create_instance_slots(device, &self.instance_bgl, self.slot_stride, slots);
            self.capacity = slots;
            log::debug!("[showcase] instance slots grown to {}", slots);
        }
        let stride = self.slot_stride as usize;
        self.staging.clear();
        self.staging.resize(stride * instances.len(), 0);
        for (i, inst) in instances.iter().enumerate() {
            let bytes = bytemuck::bytes_of(inst);
            self.staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        queue.write_buffer(&self.instance_buffer, 0, &self.staging);
    }

    /// Draw `primitive` with the uniforms written to `slot`.
    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>, primitive: &GpuPrimitive, slot: usize, wireframe: bool) {
        let (pipeline, indices, count) = if wireframe {
            (&self.wire_pipeline, &primitive.line_buffer, primitive.line_count)
        } else {
            (&self.lit_pipeline, &primitive.index_buffer, primitive.index_count)
        };
        if count == 0 {
            return;
        }
        let offset = (slot as u64 * self.slot_stride) as wgpu::DynamicOffset;
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        pass.set_bind_group(1, &self.instance_bind_group, &[offset]);
        pass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
        pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..count, 0, 0..1);
    }
}
