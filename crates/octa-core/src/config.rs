use crate::constants::{
    AMBIENT_INTENSITY, BACKGROUND_RGB, DIRECTIONAL_INTENSITY, DIRECTIONAL_POSITION,
    MATERIAL_COLOR_RGB, MATERIAL_METALNESS, MATERIAL_ROUGHNESS, OCTAHEDRON_DETAIL,
    OCTAHEDRON_RADIUS,
};
use crate::deform::WaveParams;
use glam::Vec3;

/// Surface response of the deforming mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color_rgb: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
}

/// One white ambient light and one white directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lights {
    pub ambient_intensity: f32,
    pub directional_intensity: f32,
    /// The light shines from here towards the origin.
    pub directional_position: Vec3,
}

impl Lights {
    /// Unit vector pointing from the origin towards the directional light.
    pub fn direction_to_light(&self) -> Vec3 {
        self.directional_position.normalize_or_zero()
    }
}

/// Everything the scene pass needs besides geometry and camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneStyle {
    pub background_rgb: [f32; 3],
    pub material: Material,
    pub lights: Lights,
}

/// Tunables for one visual instance. `Default` reproduces the stock look.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualConfig {
    pub radius: f32,
    pub detail: u32,
    pub wave: WaveParams,
    pub style: SceneStyle,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            radius: OCTAHEDRON_RADIUS,
            detail: OCTAHEDRON_DETAIL,
            wave: WaveParams::default(),
            style: SceneStyle {
                background_rgb: BACKGROUND_RGB,
                material: Material {
                    color_rgb: MATERIAL_COLOR_RGB,
                    metalness: MATERIAL_METALNESS,
                    roughness: MATERIAL_ROUGHNESS,
                },
                lights: Lights {
                    ambient_intensity: AMBIENT_INTENSITY,
                    directional_intensity: DIRECTIONAL_INTENSITY,
                    directional_position: Vec3::from(DIRECTIONAL_POSITION),
                },
            },
        }
    }
}
