//! Viewer configuration

use crate::camera::UpAxis;
use serde::{Deserialize, Serialize};

/// Mesh rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshRenderConfig {
    pub background_color: [f64; 4],
    pub mesh_color: [f32; 3],
    /// Direction the key light travels in
    pub light_direction: [f32; 3],
    pub enable_depth_test: bool,
}

impl Default for MeshRenderConfig {
    fn default() -> Self {
        Self {
            background_color: [1.0, 1.0, 1.0, 1.0],
            mesh_color: [0.2, 0.5, 0.8],
            light_direction: [-0.3, -0.5, -1.0],
            enable_depth_test: true,
        }
    }
}

/// Window and interaction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub up_axis: UpAxis,
    /// Vertical field of view in radians
    pub fov: f32,
    pub panel_width: f32,
    pub orbit_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub render: MeshRenderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "meshseq".to_string(),
            width: 1024,
            height: 1024,
            up_axis: UpAxis::Z,
            fov: std::f32::consts::FRAC_PI_4,
            panel_width: 100.0,
            orbit_speed: 0.01,
            pan_speed: 0.001,
            zoom_speed: 0.1,
            render: MeshRenderConfig::default(),
        }
    }
}
