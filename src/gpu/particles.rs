//! Rendering for the particle network: dots and connection lines.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use super::shaders::PARTICLE_SHADER;
use crate::particles::{max_links, Link, ParticleConfig, ParticleField};

/// Most link instances uploaded per frame. Fields large enough to exceed this
/// lose the surplus links rather than allocating quadratic buffers.
const MAX_LINK_INSTANCES: usize = 1 << 18;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct ParticleUniforms {
    viewport: [f32; 2],
    link_width: f32,
    _pad: f32,
    dot_color: [f32; 4],
    link_color: [f32; 4],
}

/// One dot: center and radius in pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct DotInstance {
    center: [f32; 2],
    radius: f32,
    _pad: f32,
}

/// One connection line: both endpoints in pixels.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct LinkInstance {
    start: [f32; 2],
    end: [f32; 2],
}

/// GPU resources for the particle layer.
pub struct ParticleLayer {
    dot_pipeline: wgpu::RenderPipeline,
    link_pipeline: wgpu::RenderPipeline,
    dot_buffer: wgpu::Buffer,
    link_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    dot_capacity: usize,
    link_capacity: usize,
    dot_count: u32,
    link_count: u32,
    uniforms: ParticleUniforms,
}

impl ParticleLayer {
    pub fn new(
        device: &wgpu::Device,
        config: &ParticleConfig,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let dot_capacity = config.count.max(1);
        let link_capacity = max_links(config.count).clamp(1, MAX_LINK_INSTANCES);

        let dot_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Dot Instance Buffer"),
            size: (dot_capacity * std::mem::size_of::<DotInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let link_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Link Instance Buffer"),
            size: (link_capacity * std::mem::size_of::<LinkInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniforms = ParticleUniforms {
            viewport: [1.0, 1.0],
            link_width: config.link_width,
            _pad: 0.0,
            dot_color: config.dot_color.to_array(),
            link_color: config.link_color.to_array(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Bind Group Layout"),
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

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let dot_attributes = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32,
            },
        ];
        let dot_pipeline = create_quad_pipeline(
            device,
            &pipeline_layout,
            &shader,
            "Dot Pipeline",
            ("vs_dot", "fs_dot"),
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<DotInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &dot_attributes,
            },
            surface_format,
        );

        let link_attributes = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
        ];
        let link_pipeline = create_quad_pipeline(
            device,
            &pipeline_layout,
            &shader,
            "Link Pipeline",
            ("vs_link", "fs_link"),
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LinkInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &link_attributes,
            },
            surface_format,
        );

        Self {
            dot_pipeline,
            link_pipeline,
            dot_buffer,
            link_buffer,
            uniform_buffer,
            bind_group,
            dot_capacity,
            link_capacity,
            dot_count: 0,
            link_count: 0,
            uniforms,
        }
    }

    /// Upload this frame's dots, links and viewport.
    pub fn prepare(&mut self, queue: &wgpu::Queue, field: &ParticleField) {
        let viewport = field.viewport();
        self.uniforms.viewport = [viewport.width.max(1.0), viewport.height.max(1.0)];
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        let dots = dot_instances(field, self.dot_capacity);
        queue.write_buffer(&self.dot_buffer, 0, bytemuck::cast_slice(&dots));
        self.dot_count = dots.len() as u32;

        let links = link_instances(field, field.links(), self.link_capacity);
        queue.write_buffer(&self.link_buffer, 0, bytemuck::cast_slice(&links));
        self.link_count = links.len() as u32;
    }

    /// Record draw calls: links underneath, dots on top.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_bind_group(0, &self.bind_group, &[]);

        if self.link_count > 0 {
            render_pass.set_pipeline(&self.link_pipeline);
            render_pass.set_vertex_buffer(0, self.link_buffer.slice(..));
            render_pass.draw(0..6, 0..self.link_count);
        }

        if self.dot_count > 0 {
            render_pass.set_pipeline(&self.dot_pipeline);
            render_pass.set_vertex_buffer(0, self.dot_buffer.slice(..));
            render_pass.draw(0..6, 0..self.dot_count);
        }
    }
}

fn dot_instances(field: &ParticleField, capacity: usize) -> Vec<DotInstance> {
    field
        .particles()
        .iter()
        .take(capacity)
        .map(|p| DotInstance {
            center: p.position.to_array(),
            radius: p.radius,
            _pad: 0.0,
        })
        .collect()
}

fn link_instances(field: &ParticleField, links: &[Link], capacity: usize) -> Vec<LinkInstance> {
    if links.len() > capacity {
        log::debug!("dropping {} links over the per-frame limit", links.len() - capacity);
    }
    let particles = field.particles();
    links
        .iter()
        .take(capacity)
        .map(|l| LinkInstance {
            start: particles[l.a].position.to_array(),
            end: particles[l.b].position.to_array(),
        })
        .collect()
}

fn create_quad_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    (vs_entry, fs_entry): (&str, &str),
    instance_layout: wgpu::VertexBufferLayout<'_>,
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers: &[instance_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
