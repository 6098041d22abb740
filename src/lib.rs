//! # meshseq
//!
//! View and export numbered OBJ mesh sequences.
//!
//! This is the umbrella crate that provides convenient access to all meshseq
//! functionality. Use it to get everything in one place, or depend on the
//! individual crates for finer control over dependencies.
//!
//! ## Crates
//!
//! - **Core**: frames, sequence discovery, the session and its capability traits
//! - **I/O**: OBJ reading and writing, file-system storage
//! - **Visualization**: wgpu renderer, egui control panel and the winit viewer
//!
//! ## Quick Start
//!
//! ```no_run
//! use meshseq::prelude::*;
//! use std::path::Path;
//!
//! let mut session = Session::default();
//! let frames = session.load(Path::new("capture/mesh0.obj"), &DiskStorage::new())?;
//! println!("{} frames", frames);
//! session.export_meshes(&DiskStorage::new())?;
//! # Ok::<(), meshseq::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: enables `visualization`
//! - `visualization`: the interactive viewer and the `meshseq-viewer` binary

// Re-export core functionality
pub use meshseq_core::*;

// Re-export sub-crates
pub use meshseq_io as io;

#[cfg(feature = "visualization")]
pub use meshseq_visualization as visualization;

/// Convenient imports for common use cases
pub mod prelude {
    pub use meshseq_core::*;
    pub use meshseq_io::*;

    #[cfg(feature = "visualization")]
    pub use meshseq_visualization::{SequenceViewer, ViewerConfig};
}
