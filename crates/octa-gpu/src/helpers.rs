use octa_core::Viewport;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Sample count of the scene pass; matches a WebGL context created with
/// `antialias: true`.
pub const SCENE_SAMPLE_COUNT: u32 = 4;

pub(crate) fn create_render_target(
    device: &wgpu::Device,
    label: &str,
    viewport: Viewport,
    format: wgpu::TextureFormat,
    sample_count: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: viewport.width.max(1),
            height: viewport.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
    (tex, view)
}

pub(crate) fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Formats for one surface and the two passes drawn into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceFormats {
    /// Configured on the surface; always the non-sRGB variant.
    pub surface: wgpu::TextureFormat,
    /// Scene view: sRGB so lit colours are encoded on write.
    pub scene: wgpu::TextureFormat,
    /// Overlay view: plain unorm so blending happens on encoded values,
    /// the way a default GL framebuffer blends.
    pub overlay: wgpu::TextureFormat,
}

impl SurfaceFormats {
    /// Extra view formats the surface must allow.
    pub fn view_formats(&self) -> Vec<wgpu::TextureFormat> {
        if self.scene == self.surface {
            Vec::new()
        } else {
            vec![self.scene]
        }
    }

    pub fn scene_view(&self, texture: &wgpu::Texture) -> wgpu::TextureView {
        texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.scene),
            ..Default::default()
        })
    }

    pub fn overlay_view(&self, texture: &wgpu::Texture) -> wgpu::TextureView {
        texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(self.overlay),
            ..Default::default()
        })
    }
}

/// Pick the 8-bit RGBA/BGRA format a surface offers, falling back to its
/// first format.
pub fn surface_formats(offered: &[wgpu::TextureFormat]) -> Option<SurfaceFormats> {
    let base = offered
        .iter()
        .copied()
        .find(|f| {
            matches!(
                f,
                wgpu::TextureFormat::Bgra8Unorm
                    | wgpu::TextureFormat::Rgba8Unorm
                    | wgpu::TextureFormat::Bgra8UnormSrgb
                    | wgpu::TextureFormat::Rgba8UnormSrgb
            )
        })
        .or_else(|| offered.first().copied())?
        .remove_srgb_suffix();
    Some(SurfaceFormats {
        surface: base,
        scene: base.add_srgb_suffix(),
        overlay: base,
    })
}

pub fn background_color(rgb: [f32; 3]) -> wgpu::Color {
    wgpu::Color {
        r: rgb[0] as f64,
        g: rgb[1] as f64,
        b: rgb[2] as f64,
        a: 1.0,
    }
}

/// Next swapchain texture, reconfiguring once if the surface went stale.
pub fn acquire_frame(
    surface: &wgpu::Surface<'_>,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
    match surface.get_current_texture() {
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            log::warn!("[gpu] surface lost; reconfiguring {}x{}", config.width, config.height);
            surface.configure(device, config);
            surface.get_current_texture()
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    #[test]
    fn srgb_surfaces_are_configured_as_unorm() {
        let f = surface_formats(&[F::Bgra8UnormSrgb, F::Bgra8Unorm]).unwrap();
        assert_eq!(f.surface, F::Bgra8Unorm);
        assert_eq!(f.scene, F::Bgra8UnormSrgb);
        assert_eq!(f.overlay, F::Bgra8Unorm);
        assert_eq!(f.view_formats(), vec![F::Bgra8UnormSrgb]);
    }

    #[test]
    fn overlay_never_blends_in_linear_space() {
        for offered in [[F::Rgba8UnormSrgb], [F::Rgba8Unorm], [F::Bgra8UnormSrgb]] {
            let f = surface_formats(&offered).unwrap();
            assert!(!f.overlay.is_srgb());
            assert!(f.scene.is_srgb());
        }
    }

    #[test]
    fn formats_without_srgb_variant_need_no_extra_views() {
        let f = surface_formats(&[F::Rgba16Float]).unwrap();
        assert_eq!(f.scene, F::Rgba16Float);
        assert!(f.view_formats().is_empty());
        assert!(surface_formats(&[]).is_none());
    }
}
