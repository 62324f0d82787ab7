//! Wireframe rendering for the projected tesseract.
//!
//! Each projected edge becomes two vertices of a line list. The vertex buffer
//! is rewritten every frame; the edge count never exceeds the capacity chosen
//! at creation.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use super::shaders::WIREFRAME_SHADER;
use crate::tesseract::{Segment, EDGE_COUNT};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct WireframeUniforms {
    view_proj: [[f32; 4]; 4],
    color: [f32; 4],
}

/// GPU state for the tesseract wireframe.
pub struct WireframeLayer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    color: Vec4,
    vertex_count: u32,
}

impl WireframeLayer {
    pub fn new(device: &wgpu::Device, color: Vec4, surface_format: wgpu::TextureFormat) -> Self {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Wireframe Vertex Buffer"),
            size: (EDGE_COUNT * 2 * std::mem::size_of::<[f32; 3]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniforms = WireframeUniforms {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            color: color.to_array(),
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Wireframe Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Wireframe Bind Group Layout"),
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
            label: Some("Wireframe Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wireframe Shader"),
            source: wgpu::ShaderSource::Wgsl(WIREFRAME_SHADER.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wireframe Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Wireframe Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x3,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
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
        });

        Self {
            pipeline,
            vertex_buffer,
            uniform_buffer,
            bind_group,
            color,
            vertex_count: 0,
        }
    }

    /// Upload this frame's segments and camera.
    pub fn prepare(&mut self, queue: &wgpu::Queue, segments: &[Segment], view_proj: Mat4) {
        let uniforms = WireframeUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            color: self.color.to_array(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let vertices = line_list(segments);
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        self.vertex_count = vertices.len() as u32;
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

/// Flatten segments into line-list vertices, at most `EDGE_COUNT` segments.
fn line_list(segments: &[Segment]) -> Vec<[f32; 3]> {
    segments
        .iter()
        .take(EDGE_COUNT)
        .flat_map(|s| [s.a.to_array(), s.b.to_array()])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tesseract::{Tesseract, TesseractConfig};
    use glam::Vec3;

    #[test]
    fn test_uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<WireframeUniforms>(), 80);
    }

    #[test]
    fn test_line_list_pairs_endpoints() {
        let segments = [Segment {
            a: Vec3::new(1.0, 2.0, 3.0),
            b: Vec3::new(-1.0, 0.0, 0.5),
        }];
        assert_eq!(line_list(&segments), vec![[1.0, 2.0, 3.0], [-1.0, 0.0, 0.5]]);
    }

    #[test]
    fn test_full_tesseract_fits_buffer() {
        let tesseract = Tesseract::new(&TesseractConfig::default());
        assert_eq!(line_list(tesseract.segments()).len(), EDGE_COUNT * 2);
    }
}
