//! WebGPU state for the two stacked canvases.
//!
//! One adapter and device drive two surfaces: the scene canvas (opaque,
//! depth tested) and the overlay canvas above it (cleared to transparent
//! each frame and composited by the browser).

use crate::constants::OVERLAY_CLEAR_RGBA;
use octa_core::{FrameTarget, OverlayError, OverlayProgram, SceneFrame, Viewport};
use octa_gpu::{
    acquire_frame, background_color, surface_formats, OverlayRenderer, SceneRenderer,
    SurfaceFormats,
};
use web_sys as web;

struct SurfaceSlot {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    formats: SurfaceFormats,
}

impl SurfaceSlot {
    fn resize(&mut self, device: &wgpu::Device, viewport: Viewport) {
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(device, &self.config);
    }
}

fn configure_slot(
    surface: wgpu::Surface<'static>,
    adapter: &wgpu::Adapter,
    device: &wgpu::Device,
    viewport: Viewport,
    transparent: bool,
) -> anyhow::Result<SurfaceSlot> {
    let caps = surface.get_capabilities(adapter);
    let formats = surface_formats(&caps.formats)
        .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
    let premultiplied = caps
        .alpha_modes
        .contains(&wgpu::CompositeAlphaMode::PreMultiplied);
    let alpha_mode = if transparent && premultiplied {
        wgpu::CompositeAlphaMode::PreMultiplied
    } else {
        caps.alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto)
    };
    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: formats.surface,
        width: viewport.width.max(1),
        height: viewport.height.max(1),
        present_mode: wgpu::PresentMode::Fifo,
        alpha_mode,
        view_formats: formats.view_formats(),
        desired_maximum_frame_latency: 2,
    };
    surface.configure(device, &config);
    Ok(SurfaceSlot {
        surface,
        config,
        formats,
    })
}

pub struct GpuState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    scene_slot: SurfaceSlot,
    overlay_slot: Option<SurfaceSlot>,
    scene: SceneRenderer,
    overlay: Option<OverlayRenderer>,
    clear_color: wgpu::Color,
    viewport: Viewport,
    pending_frames: Vec<wgpu::SurfaceTexture>,
}

impl GpuState {
    pub async fn new(
        scene_canvas: &web::HtmlCanvasElement,
        overlay_canvas: Option<&web::HtmlCanvasElement>,
        background_rgb: [f32; 3],
    ) -> anyhow::Result<Self> {
        let viewport = Viewport::new(scene_canvas.width(), scene_canvas.height());

        let instance = wgpu::Instance::default();
        let scene_surface =
            instance.create_surface(wgpu::SurfaceTarget::Canvas(scene_canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&scene_surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let scene_slot = configure_slot(scene_surface, &adapter, &device, viewport, false)?;
        let scene = SceneRenderer::new(&device, scene_slot.formats.scene, viewport);

        let overlay_slot = match overlay_canvas {
            Some(canvas) => {
                let surface =
                    instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
                Some(configure_slot(surface, &adapter, &device, viewport, true)?)
            }
            None => None,
        };
        log::info!(
            "[gpu] ready {}x{} format={:?} overlay_surface={}",
            viewport.width,
            viewport.height,
            scene_slot.formats.surface,
            overlay_slot.is_some()
        );

        Ok(Self {
            device,
            queue,
            scene_slot,
            overlay_slot,
            scene,
            overlay: None,
            clear_color: background_color(background_rgb),
            viewport,
            pending_frames: Vec::with_capacity(2),
        })
    }

    /// Build the overlay pipeline for the overlay canvas.
    pub async fn attach_overlay(&mut self, program: &OverlayProgram) -> Result<(), OverlayError> {
        let Some(slot) = &self.overlay_slot else {
            return Err(OverlayError::ProgramLink(
                "no overlay surface to draw into".into(),
            ));
        };
        let renderer = OverlayRenderer::new(&self.device, slot.formats.overlay, program).await?;
        self.overlay = Some(renderer);
        Ok(())
    }

    pub fn resize_if_needed(&mut self, viewport: Viewport) {
        if viewport.is_empty() || viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.scene_slot.resize(&self.device, viewport);
        if let Some(slot) = &mut self.overlay_slot {
            slot.resize(&self.device, viewport);
        }
        self.scene.resize(&self.device, viewport);
    }
}

impl FrameTarget for GpuState {
    type Error = anyhow::Error;

    fn draw_scene(&mut self, frame: &SceneFrame<'_>) -> anyhow::Result<()> {
        self.resize_if_needed(frame.viewport);
        let slot = &self.scene_slot;
        let output = acquire_frame(&slot.surface, &self.device, &slot.config)?;
        let view = slot.formats.scene_view(&output.texture);
        self.scene.prepare(&self.device, &self.queue, frame);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        self.scene.draw(&mut encoder, &view, self.clear_color);
        self.queue.submit(Some(encoder.finish()));
        self.pending_frames.push(output);
        Ok(())
    }

    fn draw_overlay(&mut self, uniforms: &[u8], viewport: Viewport) -> anyhow::Result<()> {
        let (Some(slot), Some(overlay)) = (&self.overlay_slot, &self.overlay) else {
            return Err(anyhow::anyhow!("overlay pipeline not attached"));
        };
        let output = acquire_frame(&slot.surface, &self.device, &slot.config)?;
        let view = slot.formats.overlay_view(&output.texture);
        let [r, g, b, a] = OVERLAY_CLEAR_RGBA;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay_encoder"),
            });
        overlay.draw(
            &mut encoder,
            &self.queue,
            &view,
            uniforms,
            viewport,
            Some(wgpu::Color { r, g, b, a }),
        );
        self.queue.submit(Some(encoder.finish()));
        self.pending_frames.push(output);
        Ok(())
    }

    fn present(&mut self) -> anyhow::Result<()> {
        for frame in self.pending_frames.drain(..) {
            frame.present();
        }
        Ok(())
    }
}
