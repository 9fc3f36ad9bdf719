use super::helpers::{self, DepthMode, PipelineSpec};
use crate::core::ParticleSpec;
use glam::Mat4;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PointsUniforms {
    pub(crate) view: [[f32; 4]; 4],
    pub(crate) proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) color: [f32; 4],
    pub(crate) size: f32,
    pub(crate) _pad: [f32; 3],
}

impl PointsUniforms {
    /// White particles drawn at the cloud's size and opacity.
    pub(crate) fn new(view: Mat4, proj: Mat4, model: Mat4, spec: &ParticleSpec) -> Self {
        Self {
            view: helpers::mat4_cols(view),
            proj: helpers::mat4_cols(proj),
            model: helpers::mat4_cols(model),
            color: [1.0, 1.0, 1.0, spec.opacity],
            size: spec.size,
            _pad: [0.0; 3],
        }
    }
}

/// One particle cloud: a static instance buffer of centres and its uniforms.
pub(crate) struct PointsResources {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    count: u32,
}

const INSTANCE_ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

pub(crate) fn create_points_resources(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    positions: &[[f32; 3]],
) -> PointsResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("points_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::core::POINTS_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("points_bgl"),
        entries: &[helpers::uniform_entry(
            0,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            None,
        )],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("points_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let instance_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRIBS,
    };
    let pipeline = helpers::make_scene_pipeline(
        device,
        PipelineSpec {
            label: "points_pipeline",
            layout: &pl,
            shader: &shader,
            vs_entry: "vs_points",
            fs_entry: "fs_points",
            buffers: &[instance_layout],
            topology: wgpu::PrimitiveTopology::TriangleList,
            color_format,
            blend: Some(helpers::ADDITIVE_BLENDING),
            depth: DepthMode::TestOnly,
        },
    );
    let uniform_buffer =
        helpers::uniform_buffer(device, "points_uniforms", std::mem::size_of::<PointsUniforms>() as u64);
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("points_bg"),
        layout: &bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("points_instances"),
        contents: bytemuck::cast_slice(positions),
        usage: wgpu::BufferUsages::VERTEX,
    });

    PointsResources {
        pipeline,
        uniform_buffer,
        bind_group,
        instance_buffer,
        count: positions.len() as u32,
    }
}

impl PointsResources {
    pub(crate) fn write(&self, queue: &wgpu::Queue, uniforms: &PointsUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}
