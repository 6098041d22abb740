//! Visualization for meshseq
//!
//! A wgpu/winit window showing one frame of a mesh sequence at a time, with
//! an egui control panel for loading, scrubbing and exporting:
//! - Orbit camera with mouse controls
//! - Mesh rendering with two-sided lighting
//! - Off-screen capture for screenshot export
//! - Native file dialog for picking a sequence

pub mod camera;
pub mod config;
pub mod device;
pub mod renderer;
pub mod gui;
pub mod panel;
pub mod dialog;
pub mod viewer;

pub use camera::*;
pub use config::*;
pub use device::GpuContext;
pub use renderer::*;
pub use panel::ControlPanel;
pub use dialog::NativeFilePicker;
pub use viewer::SequenceViewer;

use meshseq_core::{Result, Session};

/// Open a viewer on an already loaded session and block until it closes
pub fn show_session(session: Session, config: ViewerConfig) -> Result<()> {
    SequenceViewer::new(config, session).run()
}
