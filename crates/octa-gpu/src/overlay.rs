//! GPU side of the overlay: a full-screen quad drawn with the linked
//! [`OverlayProgram`], alpha-blended over whatever is already in the target.

use crate::helpers::uniform_layout_entry;
use octa_core::constants::QUAD_VERTICES;
use octa_core::{OverlayError, OverlayProgram, Stage, Viewport};
use wgpu::util::DeviceExt;

/// Source-over with the same factors on colour and alpha, as
/// `blendFunc(SRC_ALPHA, ONE_MINUS_SRC_ALPHA)` does. `ALPHA_BLENDING` uses
/// `One` for source alpha, which doubles the stored coverage on a
/// transparent target.
pub const OVERLAY_BLEND: wgpu::BlendState = wgpu::BlendState {
    color: SOURCE_OVER,
    alpha: SOURCE_OVER,
};

const SOURCE_OVER: wgpu::BlendComponent = wgpu::BlendComponent {
    src_factor: wgpu::BlendFactor::SrcAlpha,
    dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
    operation: wgpu::BlendOperation::Add,
};

struct OverlayUniforms {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    size: usize,
}

pub struct OverlayRenderer {
    pipeline: wgpu::RenderPipeline,
    quad_vb: wgpu::Buffer,
    uniforms: Option<OverlayUniforms>,
}

impl OverlayRenderer {
    /// Create the shader modules and the pipeline for `program`.
    ///
    /// Each step runs in a validation error scope; anything the device
    /// rejects is reported as a compile or link error and nothing is kept.
    pub async fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        program: &OverlayProgram,
    ) -> Result<Self, OverlayError> {
        let vs = create_module(device, Stage::Vertex, &program.vertex.source).await?;
        let fs = create_module(device, Stage::Fragment, &program.fragment.source).await?;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let layouts: Vec<wgpu::BindGroupLayout> = program
            .uniforms
            .iter()
            .map(|block| {
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("overlay_bgl"),
                    entries: &[uniform_layout_entry(block.binding)],
                })
            })
            .collect();
        let layout_refs: Vec<&wgpu::BindGroupLayout> = layouts.iter().collect();
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("overlay_pl"),
            bind_group_layouts: &layout_refs,
            push_constant_ranges: &[],
        });
        let attributes = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x2,
            offset: 0,
            shader_location: program.position_location,
        }];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("overlay_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(program.vertex.entry_point.as_str()),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &attributes,
                }],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(program.fragment.entry_point.as_str()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(OVERLAY_BLEND),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        if let Some(e) = device.pop_error_scope().await {
            return Err(OverlayError::ProgramLink(e.to_string()));
        }

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("overlay_quad"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniforms = program.uniforms.zip(layouts.first()).map(|(block, bgl)| {
            let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("overlay_uniforms"),
                size: block.size as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("overlay_bg"),
                layout: bgl,
                entries: &[wgpu::BindGroupEntry {
                    binding: block.binding,
                    resource: buffer.as_entire_binding(),
                }],
            });
            OverlayUniforms {
                buffer,
                bind_group,
                size: block.size as usize,
            }
        });
        log::info!(
            "[overlay] pipeline ready (position @location({}), uniforms={})",
            program.position_location,
            uniforms.is_some()
        );

        Ok(Self {
            pipeline,
            quad_vb,
            uniforms,
        })
    }

    /// Draw the overlay over `view`.
    ///
    /// `clear` is `Some` when the overlay owns its target and must start from
    /// transparent pixels, `None` when it composites over an existing scene.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        uniforms: &[u8],
        viewport: Viewport,
        clear: Option<wgpu::Color>,
    ) {
        if let Some(u) = &self.uniforms {
            if uniforms.len() == u.size {
                queue.write_buffer(&u.buffer, 0, uniforms);
            } else {
                log::warn!(
                    "[overlay] uniform payload is {} bytes, expected {}",
                    uniforms.len(),
                    u.size
                );
            }
        }

        let load = match clear {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        };
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("overlay_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        if viewport.is_empty() {
            return;
        }
        rpass.set_viewport(
            0.0,
            0.0,
            viewport.width as f32,
            viewport.height as f32,
            0.0,
            1.0,
        );
        rpass.set_pipeline(&self.pipeline);
        if let Some(u) = &self.uniforms {
            rpass.set_bind_group(0, &u.bind_group, &[]);
        }
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
    }
}

async fn create_module(
    device: &wgpu::Device,
    stage: Stage,
    source: &str,
) -> Result<wgpu::ShaderModule, OverlayError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            Stage::Vertex => "overlay_vs",
            Stage::Fragment => "overlay_fs",
        }),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    match device.pop_error_scope().await {
        Some(e) => Err(OverlayError::ShaderCompile {
            stage,
            diagnostic: e.to_string(),
        }),
        None => Ok(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Evaluate one blend component for a single channel.
    fn blend(c: wgpu::BlendComponent, src: f32, src_alpha: f32, dst: f32) -> f32 {
        let factor = |f: wgpu::BlendFactor| match f {
            wgpu::BlendFactor::One => 1.0,
            wgpu::BlendFactor::Zero => 0.0,
            wgpu::BlendFactor::SrcAlpha => src_alpha,
            wgpu::BlendFactor::OneMinusSrcAlpha => 1.0 - src_alpha,
            other => panic!("unexpected factor {other:?}"),
        };
        assert_eq!(c.operation, wgpu::BlendOperation::Add);
        src * factor(c.src_factor) + dst * factor(c.dst_factor)
    }

    #[test]
    fn colour_and_alpha_share_source_over_factors() {
        assert_eq!(OVERLAY_BLEND.color, OVERLAY_BLEND.alpha);
        assert_eq!(OVERLAY_BLEND.alpha.src_factor, wgpu::BlendFactor::SrcAlpha);
        assert_eq!(
            OVERLAY_BLEND.alpha.dst_factor,
            wgpu::BlendFactor::OneMinusSrcAlpha
        );
    }

    #[test]
    fn lit_petal_over_transparent_stores_quarter_alpha() {
        // fragment (1, 1, 1, 0.5) over a cleared (0, 0, 0, 0) target
        let a = blend(OVERLAY_BLEND.alpha, 0.5, 0.5, 0.0);
        let c = blend(OVERLAY_BLEND.color, 1.0, 0.5, 0.0);
        assert_eq!(a, 0.25);
        assert_eq!(c, 0.5);
    }

    #[test]
    fn opaque_scene_below_stays_opaque() {
        let a = blend(OVERLAY_BLEND.alpha, 0.5, 0.5, 1.0);
        assert_eq!(a, 0.75);
        let c = blend(OVERLAY_BLEND.color, 1.0, 0.5, 1.0);
        assert_eq!(c, 1.0);
    }
}
