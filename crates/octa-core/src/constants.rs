// Shared visual tuning constants used by both web and native frontends.

// Wave deformation
pub const WAVE_FREQUENCY: f64 = 1.5; // spatial frequency along the radius
pub const WAVE_SPEED: f64 = 2.0; // temporal speed (radians per second)
pub const WAVE_AMPLITUDE: f64 = 5.0; // peak displacement in world units

// Per-frame spin, deliberately not scaled by elapsed time
pub const SPIN_Y_PER_FRAME: f32 = 0.01;
pub const SPIN_X_PER_FRAME: f32 = 0.005;

// Geometry
pub const OCTAHEDRON_RADIUS: f32 = 50.0;
pub const OCTAHEDRON_DETAIL: u32 = 0;

// Camera
pub const CAMERA_FOVY_DEGREES: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_EYE: [f32; 3] = [0.0, 0.0, 200.0];

// Material (light grey, half metallic, fairly glossy)
pub const MATERIAL_COLOR_RGB: [f32; 3] = [0.8, 0.8, 0.8]; // 0xcccccc
pub const MATERIAL_METALNESS: f32 = 0.5;
pub const MATERIAL_ROUGHNESS: f32 = 0.2;

// Lights
pub const AMBIENT_INTENSITY: f32 = 1.0;
pub const DIRECTIONAL_INTENSITY: f32 = 1.5;
pub const DIRECTIONAL_POSITION: [f32; 3] = [50.0, 100.0, 50.0];

// Overlay
pub const MS_TO_SECONDS: f64 = 0.001;
pub const OVERLAY_MAX_ALPHA: f32 = 0.5;
pub const PETAL_LOBES: f32 = 3.0;
pub const PETAL_SPEED: f32 = 2.0;
pub const RING_FREQUENCY: f32 = 10.0;
pub const RING_SPEED: f32 = 5.0;
pub const RING_BAND: f32 = 0.1;
pub const EDGE_SOFTNESS: f32 = 0.01;

/// Full-screen quad in normalized device coordinates, two triangles.
pub const QUAD_VERTICES: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [-1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [1.0, 1.0],
];

// Scene background (white)
pub const BACKGROUND_RGB: [f32; 3] = [1.0, 1.0, 1.0];
