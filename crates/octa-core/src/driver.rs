//! Per-frame orchestration.
//!
//! `FrameDriver` owns every piece of state that changes between frames and
//! hands read-only views of it to a [`FrameTarget`], which is whatever
//! actually talks to the GPU. Order within a tick is fixed: deform, recompute
//! normals, spin, draw the scene, draw the overlay, present.

use crate::camera::{Camera, Viewport};
use crate::config::{SceneStyle, VisualConfig};
use crate::deform::{MeshDeformer, Spin};
use crate::geometry::{octahedron, Mesh};
use crate::overlay::OverlayProgram;
use glam::Mat4;
use std::fmt;

/// Read-only snapshot of the 3D scene for one frame.
pub struct SceneFrame<'a> {
    pub mesh: &'a Mesh,
    pub model: Mat4,
    pub camera: &'a Camera,
    pub viewport: Viewport,
    pub style: &'a SceneStyle,
}

/// Rendering backend driven once per frame.
pub trait FrameTarget {
    type Error: fmt::Display;

    fn draw_scene(&mut self, frame: &SceneFrame<'_>) -> Result<(), Self::Error>;

    /// `uniforms` are already packed for the overlay program's uniform block.
    fn draw_overlay(&mut self, uniforms: &[u8], viewport: Viewport) -> Result<(), Self::Error>;

    fn present(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct FrameDriver {
    config: VisualConfig,
    deformer: MeshDeformer,
    mesh: Mesh,
    spin: Spin,
    camera: Camera,
    viewport: Viewport,
    overlay: Option<OverlayProgram>,
    frame_count: u64,
}

impl FrameDriver {
    pub fn new(config: VisualConfig, viewport: Viewport, overlay: Option<OverlayProgram>) -> Self {
        let mesh = octahedron(config.radius, config.detail);
        let deformer = MeshDeformer::with_wave(mesh.positions.clone(), config.wave);
        log::info!(
            "[driver] mesh vertices={} viewport={}x{} overlay={}",
            mesh.vertex_count(),
            viewport.width,
            viewport.height,
            overlay.is_some()
        );
        Self {
            config,
            deformer,
            mesh,
            spin: Spin::default(),
            camera: Camera::new(viewport),
            viewport,
            overlay,
            frame_count: 0,
        }
    }

    /// Advance one frame at `time_ms` and draw it into `target`.
    pub fn tick<T: FrameTarget>(&mut self, time_ms: f64, target: &mut T) {
        self.deformer.update(&mut self.mesh.positions, time_ms);
        self.mesh.compute_vertex_normals();
        self.spin.advance();
        self.frame_count += 1;

        let frame = SceneFrame {
            mesh: &self.mesh,
            model: self.spin.model_matrix(),
            camera: &self.camera,
            viewport: self.viewport,
            style: &self.config.style,
        };
        if let Err(e) = target.draw_scene(&frame) {
            log::error!("scene render error: {e}");
        }

        if let Some(program) = &self.overlay {
            let uniforms = program.encode_uniforms(time_ms, self.viewport);
            if let Err(e) = target.draw_overlay(&uniforms, self.viewport) {
                log::error!("overlay render error: {e}");
            }
        }

        if let Err(e) = target.present() {
            log::error!("present error: {e}");
        }
    }

    /// Record a new drawable size for both the camera and the overlay.
    /// Returns `false` for zero-sized or unchanged viewports.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        let viewport = Viewport::new(width, height);
        if viewport.is_empty() || viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.camera.set_viewport(viewport);
        log::info!("[driver] resized to {}x{}", width, height);
        true
    }

    /// Stop issuing overlay draws, e.g. after its GPU setup failed.
    pub fn disable_overlay(&mut self) {
        if self.overlay.take().is_some() {
            log::warn!("[driver] overlay disabled; rendering the scene only");
        }
    }

    pub fn overlay(&self) -> Option<&OverlayProgram> {
        self.overlay.as_ref()
    }

    pub fn overlay_active(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn deformer(&self) -> &MeshDeformer {
        &self.deformer
    }

    pub fn spin(&self) -> Spin {
        self.spin
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
