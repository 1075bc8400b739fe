use octa_core::{
    Clock, FrameDriver, FrameTarget, OverlayError, OverlayProgram, SceneFrame, Viewport,
    VisualConfig, OVERLAY_FRAG_WGSL, OVERLAY_VERT_WGSL,
};
use octa_gpu::{
    acquire_frame, background_color, surface_formats, OverlayRenderer, SceneRenderer,
    SurfaceFormats,
};
use winit::{event::*, event_loop::EventLoop, window::WindowBuilder};

// The window has a single surface, so the overlay composites onto the
// scene's swapchain image instead of owning a transparent target.
struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    formats: SurfaceFormats,
    scene: SceneRenderer,
    overlay: Option<OverlayRenderer>,
    clear_color: wgpu::Color,
    current: Option<wgpu::SurfaceTexture>,
    out_of_memory: bool,
}

impl<'w> GpuState<'w> {
    async fn new(
        window: &'w winit::window::Window,
        background_rgb: [f32; 3],
    ) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let viewport = Viewport::new(size.width.max(1), size.height.max(1));
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let formats = surface_formats(&surface_caps.formats)
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: formats.surface,
            width: viewport.width,
            height: viewport.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            desired_maximum_frame_latency: 2,
            view_formats: formats.view_formats(),
        };
        surface.configure(&device, &config);
        let scene = SceneRenderer::new(&device, formats.scene, viewport);
        log::info!(
            "[gpu] {} {}x{} format={:?}",
            adapter.get_info().name,
            viewport.width,
            viewport.height,
            formats.surface
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            formats,
            scene,
            overlay: None,
            clear_color: background_color(background_rgb),
            current: None,
            out_of_memory: false,
        })
    }

    async fn attach_overlay(&mut self, program: &OverlayProgram) -> Result<(), OverlayError> {
        let renderer = OverlayRenderer::new(&self.device, self.formats.overlay, program).await?;
        self.overlay = Some(renderer);
        Ok(())
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.scene
            .resize(&self.device, Viewport::new(new_size.width, new_size.height));
    }
}

impl FrameTarget for GpuState<'_> {
    type Error = anyhow::Error;

    fn draw_scene(&mut self, frame: &SceneFrame<'_>) -> anyhow::Result<()> {
        let output = match acquire_frame(&self.surface, &self.device, &self.config) {
            Ok(output) => output,
            Err(e) => {
                self.out_of_memory |= matches!(e, wgpu::SurfaceError::OutOfMemory);
                return Err(e.into());
            }
        };
        let view = self.formats.scene_view(&output.texture);
        self.scene.prepare(&self.device, &self.queue, frame);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        self.scene.draw(&mut encoder, &view, self.clear_color);
        self.queue.submit(Some(encoder.finish()));
        self.current = Some(output);
        Ok(())
    }

    fn draw_overlay(&mut self, uniforms: &[u8], viewport: Viewport) -> anyhow::Result<()> {
        let Some(overlay) = &self.overlay else {
            return Err(anyhow::anyhow!("overlay pipeline not attached"));
        };
        // Nothing to composite onto when the scene frame was not acquired.
        let Some(output) = &self.current else {
            return Ok(());
        };
        let view = self.formats.overlay_view(&output.texture);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay_encoder"),
            });
        overlay.draw(&mut encoder, &self.queue, &view, uniforms, viewport, None);
        self.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn present(&mut self) -> anyhow::Result<()> {
        if let Some(output) = self.current.take() {
            output.present();
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("octa-veil (native)")
        .build(&event_loop)?;

    let config = VisualConfig::default();
    let mut gpu = pollster::block_on(GpuState::new(&window, config.style.background_rgb))?;
    let size = window.inner_size();
    let program = OverlayProgram::build_or_log(OVERLAY_VERT_WGSL, OVERLAY_FRAG_WGSL);
    let mut driver = FrameDriver::new(config, Viewport::new(size.width, size.height), program);
    if let Some(program) = driver.overlay().cloned() {
        if let Err(e) = pollster::block_on(gpu.attach_overlay(&program)) {
            log::error!("[overlay] {e}");
            driver.disable_overlay();
        }
    }
    let clock = Clock::start();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => {
            gpu.resize(size);
            driver.resize(size.width, size.height);
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event: WindowEvent::RedrawRequested,
            ..
        } => {
            driver.tick(clock.elapsed_ms(), &mut gpu);
            if gpu.out_of_memory {
                log::error!("GPU out of memory; exiting");
                elwt.exit();
            }
        }
        Event::AboutToWait => gpu.window.request_redraw(),
        _ => {}
    })?;
    Ok(())
}
