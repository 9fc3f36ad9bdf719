use super::helpers::{self, DepthMode, PipelineSpec};
use glam::{Mat4, Vec2, Vec3};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SpriteUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) tint: [f32; 4],
    pub(crate) glow: f32,
    pub(crate) alpha_test: f32,
    pub(crate) _pad: [f32; 2],
}

/// Per-frame appearance of one quad.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SpriteLook {
    pub(crate) position: Vec3,
    pub(crate) color: [f32; 3],
    pub(crate) opacity: f32,
    pub(crate) glow: f32,
    pub(crate) alpha_test: f32,
}

pub(crate) struct SpritePipeline {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

/// A textured quad of fixed world size facing +Z.
pub(crate) struct Sprite {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    size: Vec2,
}

pub(crate) fn create_sprite_pipeline(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> SpritePipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("sprites_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::core::SPRITES_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("sprites_bgl"),
        entries: &[
            helpers::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT, None),
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("sprites_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });
    let pipeline = helpers::make_scene_pipeline(
        device,
        PipelineSpec {
            label: "sprites_pipeline",
            layout: &pl,
            shader: &shader,
            vs_entry: "vs_sprite",
            fs_entry: "fs_sprite",
            buffers: &[],
            topology: wgpu::PrimitiveTopology::TriangleList,
            color_format,
            blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
            depth: DepthMode::TestOnly,
        },
    );
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("sprites_sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });
    SpritePipeline {
        pipeline,
        bgl,
        sampler,
    }
}

impl SpritePipeline {
    pub(crate) fn create_sprite(&self, device: &wgpu::Device, view: &wgpu::TextureView, size: Vec2) -> Sprite {
        let uniform_buffer =
            helpers::uniform_buffer(device, "sprite_uniforms", std::mem::size_of::<SpriteUniforms>() as u64);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_bg"),
            layout: &self.bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        Sprite {
            uniform_buffer,
            bind_group,
            size,
        }
    }
}

impl Sprite {
    pub(crate) fn write(&self, queue: &wgpu::Queue, view_proj: Mat4, look: &SpriteLook) {
        let model = Mat4::from_translation(look.position) * Mat4::from_scale(self.size.extend(1.0));
        let [r, g, b] = look.color;
        let uniforms = SpriteUniforms {
            view_proj: helpers::mat4_cols(view_proj),
            model: helpers::mat4_cols(model),
            tint: [r, g, b, look.opacity],
            glow: look.glow,
            alpha_test: look.alpha_test,
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>, pipeline: &SpritePipeline) {
        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..6, 0..1);
    }
}
