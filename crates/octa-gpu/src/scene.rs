//! Lit pass for the deforming mesh.
//!
//! Vertices are re-uploaded every frame because the deformer moves all of
//! them; the buffer only grows when the mesh does.

use crate::helpers::{
    create_render_target, uniform_layout_entry, DEPTH_FORMAT, SCENE_SAMPLE_COUNT,
};
use glam::Vec3;
use octa_core::{Mesh, SceneFrame, Viewport};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    light_dir: [f32; 4],
    ambient: [f32; 4],
    base_color: [f32; 4],
    material: [f32; 4],
}

impl SceneUniforms {
    fn from_frame(frame: &SceneFrame<'_>) -> Self {
        let lights = &frame.style.lights;
        let material = &frame.style.material;
        let l = lights.direction_to_light();
        let a = lights.ambient_intensity;
        let [r, g, b] = material.color_rgb;
        Self {
            view_proj: frame.camera.view_proj().to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            camera_pos: frame.camera.eye.extend(1.0).to_array(),
            light_dir: [l.x, l.y, l.z, lights.directional_intensity],
            ambient: [a, a, a, 1.0],
            base_color: [r, g, b, 1.0],
            material: [material.metalness, material.roughness, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

impl SceneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

// Indexed meshes are expanded so the pipeline only ever sees a triangle list.
fn pack_vertices(mesh: &Mesh, out: &mut Vec<SceneVertex>) {
    out.clear();
    let vertex = |i: usize| SceneVertex {
        position: mesh.positions[i].to_array(),
        normal: mesh.normals.get(i).copied().unwrap_or(Vec3::ZERO).to_array(),
    };
    match &mesh.indices {
        Some(indices) => out.extend(
            indices
                .iter()
                .map(|&i| i as usize)
                .filter(|&i| i < mesh.positions.len())
                .map(vertex),
        ),
        None => out.extend((0..mesh.positions.len()).map(vertex)),
    }
}

pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    vertex_count: u32,
    staging: Vec<SceneVertex>,
    color_format: wgpu::TextureFormat,
    targets: SceneTargets,
    viewport: Viewport,
}

// Multisampled colour and depth, resolved into the caller's view.
struct SceneTargets {
    _color_tex: wgpu::Texture,
    color_view: wgpu::TextureView,
    _depth_tex: wgpu::Texture,
    depth_view: wgpu::TextureView,
}

impl SceneTargets {
    fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat, viewport: Viewport) -> Self {
        let (color_tex, color_view) = create_render_target(
            device,
            "scene_msaa_color",
            viewport,
            color_format,
            SCENE_SAMPLE_COUNT,
        );
        let (depth_tex, depth_view) = create_render_target(
            device,
            "scene_depth",
            viewport,
            DEPTH_FORMAT,
            SCENE_SAMPLE_COUNT,
        );
        Self {
            _color_tex: color_tex,
            color_view,
            _depth_tex: depth_tex,
            depth_view,
        }
    }
}

fn multisample_state() -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: SCENE_SAMPLE_COUNT,
        mask: !0,
        alpha_to_coverage_enabled: false,
    }
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(octa_core::SCENE_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[uniform_layout_entry(0)],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SceneVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: multisample_state(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scene_uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let (vertex_buffer, vertex_capacity) = create_vertex_buffer(device, 0);

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            vertex_buffer,
            vertex_capacity,
            vertex_count: 0,
            staging: Vec::new(),
            color_format,
            targets: SceneTargets::new(device, color_format, viewport),
            viewport,
        }
    }

    /// Recreate the multisampled targets when the drawable size changes.
    pub fn resize(&mut self, device: &wgpu::Device, viewport: Viewport) {
        if viewport.is_empty() || viewport == self.viewport {
            return;
        }
        self.targets = SceneTargets::new(device, self.color_format, viewport);
        self.viewport = viewport;
    }

    /// Upload this frame's uniforms and vertices.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        frame: &SceneFrame<'_>,
    ) {
        self.resize(device, frame.viewport);
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&SceneUniforms::from_frame(frame)),
        );

        pack_vertices(frame.mesh, &mut self.staging);
        if self.staging.len() > self.vertex_capacity {
            (self.vertex_buffer, self.vertex_capacity) =
                create_vertex_buffer(device, self.staging.len());
        }
        if !self.staging.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.staging));
        }
        self.vertex_count = self.staging.len() as u32;
    }

    /// Clear to `clear`, draw the mesh prepared last and resolve into `view`,
    /// which must have the format the renderer was created with.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear: wgpu::Color,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.targets.color_view,
                resolve_target: Some(view),
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Discard,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.targets.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        if self.vertex_count == 0 {
            return;
        }
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertices: usize) -> (wgpu::Buffer, usize) {
    // wgpu rejects zero-sized vertex buffers being bound, so keep at least one triangle.
    let capacity = vertices.max(3);
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("scene_vertices"),
        size: (capacity * std::mem::size_of::<SceneVertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    (buffer, capacity)
}
