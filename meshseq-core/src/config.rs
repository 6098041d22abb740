//! Session configuration

use serde::{Deserialize, Serialize};

/// Where exported frames go, relative to the sequence folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportLayout {
    pub screenshot_dir: String,
    pub screenshot_stem: String,
    pub screenshot_extension: String,
    pub mesh_dir: String,
    pub mesh_stem: String,
    pub mesh_extension: String,
}

impl Default for ExportLayout {
    fn default() -> Self {
        Self {
            screenshot_dir: "polyimags".to_string(),
            screenshot_stem: "output_".to_string(),
            screenshot_extension: "png".to_string(),
            mesh_dir: "meshSequence".to_string(),
            mesh_stem: "mesh_".to_string(),
            mesh_extension: "obj".to_string(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File number of the first frame
    pub start_id: u32,
    /// Name the displayed mesh is registered under
    pub mesh_name: String,
    pub export: ExportLayout,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_id: 0,
            mesh_name: "mesh".to_string(),
            export: ExportLayout::default(),
        }
    }
}
