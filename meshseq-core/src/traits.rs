//! Capability traits the session depends on
//!
//! The session never touches the window, the GPU or the disk directly. The
//! viewer hands it a [`RenderSink`], a [`MeshStorage`] and a [`FilePicker`],
//! and tests hand it in-memory doubles.

use crate::{frame::Frame, point::*, Result};
use std::path::{Path, PathBuf};

/// Scene side of the viewer: the place meshes are displayed and captured
pub trait RenderSink {
    /// Register a mesh under `name`, replacing any object with that name
    fn register_mesh(&mut self, name: &str, vertices: &[Point3f], faces: &[Face]) -> Result<()>;

    /// Move the vertices of an already registered mesh, keeping its topology
    fn update_vertex_positions(&mut self, name: &str, vertices: &[Point3f]) -> Result<()>;

    /// Capture the current scene to an image file
    fn screenshot(&mut self, path: &Path) -> Result<()>;
}

/// File-system side: probing, directory creation and frame (de)serialization
pub trait MeshStorage {
    /// Whether a file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Create `path` as a directory unless it already exists
    fn ensure_dir(&self, path: &Path) -> Result<()>;

    /// Read one frame file
    fn read_frame(&self, path: &Path) -> Result<Frame>;

    /// Write one frame file
    fn write_frame(&self, frame: &Frame, path: &Path) -> Result<()>;
}

/// Interactive choice of the sequence to open
pub trait FilePicker {
    /// Ask the user for one frame file; `None` when cancelled
    fn pick_frame_file(&mut self) -> Option<PathBuf>;
}

impl<F> FilePicker for F
where
    F: FnMut() -> Option<PathBuf>,
{
    fn pick_frame_file(&mut self) -> Option<PathBuf> {
        self()
    }
}
